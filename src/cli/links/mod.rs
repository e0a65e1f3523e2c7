//! Internal link validation command.
//!
//! Two phases, no loops back:
//! 1. build the path index and redirect table for the whole root
//! 2. scan every document, resolve each internal link, report failures

mod report;
mod scan;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use crate::address::conflict::print_conflicts;
use crate::address::{PathIndex, RedirectTable, Resolution, Resolver};
use crate::cli::LinksArgs;
use crate::config::{ConflictLevel, LinksConfig, ToolConfig};
use crate::utils::path::{has_extension, relative_display};
use crate::utils::{plural_count, plural_s};
use crate::{debug, log};

use report::{BrokenLink, IssueCategory, ValidationReport};
use scan::extract_internal_links;

/// Validate internal links. Returns `true` when no broken link was found
/// (or `--warn-only` was given).
pub fn validate_links(config: &ToolConfig, args: &LinksArgs) -> Result<bool> {
    let root = fs::canonicalize(config.get_root()).with_context(|| {
        format!(
            "cannot read documentation root `{}`",
            config.get_root().display()
        )
    })?;
    let links_config = &config.links;

    // Phase 1: indices
    let index = PathIndex::build(&root, links_config)?;
    let redirects = RedirectTable::load(
        &config.root_join(&links_config.docs_config),
        &links_config.wildcard,
    );

    if !index.conflicts().is_empty() {
        match links_config.conflicts {
            ConflictLevel::Warn => print_conflicts("warning", index.conflicts()),
            ConflictLevel::Error => {
                print_conflicts("error", index.conflicts());
                bail!(
                    "{} claimed by more than one file",
                    plural_count(index.conflicts().len(), "path")
                );
            }
        }
    }

    let documents = select_documents(&index, &root, args, links_config)?;

    log!("links"; "checking {}", plural_count(documents.len(), "document"));
    log!("links"; "found {} valid document path{}", index.document_count(), plural_s(index.document_count()));
    log!("links"; "found {}", plural_count(index.asset_count(), "static file"));
    log!("links"; "loaded {}", redirects.summary());

    // Phase 2: scan and report
    let checker = LinkChecker::new(
        &root,
        Resolver::new(&index, &redirects),
        &links_config.skip_substrings,
    );
    let report = checker.check_all(&documents);

    report.print();
    log!("links"; "{}", report);

    if report.is_success() {
        return Ok(true);
    }
    if args.warn_only {
        log!("warning"; "broken links reported as warnings only");
        return Ok(true);
    }
    Ok(false)
}

/// Resolve the documents to scan: all indexed documents, or the subset
/// under the given paths.
fn select_documents(
    index: &PathIndex,
    root: &Path,
    args: &LinksArgs,
    config: &LinksConfig,
) -> Result<Vec<PathBuf>> {
    if args.paths.is_empty() {
        return Ok(index.documents().to_vec());
    }

    let mut selected = Vec::new();
    for path in &args.paths {
        let abs = fs::canonicalize(path)
            .with_context(|| format!("cannot access `{}`", path.display()))?;
        if !abs.starts_with(root) {
            bail!(
                "`{}` is outside the documentation root `{}`",
                path.display(),
                root.display()
            );
        }

        if abs.is_dir() {
            selected.extend(
                index
                    .documents()
                    .iter()
                    .filter(|doc| doc.starts_with(&abs))
                    .cloned(),
            );
        } else if has_extension(&abs, &config.extensions) {
            selected.push(abs);
        } else {
            debug!("links"; "skipping non-document {}", path.display());
        }
    }

    selected.sort();
    selected.dedup();
    Ok(selected)
}

/// Checks the links of individual documents against shared lookup tables.
pub struct LinkChecker<'a> {
    root: &'a Path,
    resolver: Resolver<'a>,
    skip_substrings: &'a [String],
}

impl<'a> LinkChecker<'a> {
    pub fn new(root: &'a Path, resolver: Resolver<'a>, skip_substrings: &'a [String]) -> Self {
        Self {
            root,
            resolver,
            skip_substrings,
        }
    }

    /// Check documents in parallel and merge the per-worker reports.
    pub fn check_all(&self, documents: &[PathBuf]) -> ValidationReport {
        documents
            .par_iter()
            .fold(ValidationReport::default, |mut report, file| {
                self.check_file(file, &mut report);
                report
            })
            .reduce(ValidationReport::default, ValidationReport::merge)
    }

    /// Read one document and record its broken links.
    ///
    /// A read failure is recorded as a diagnostic for that document.
    pub fn check_file(&self, file: &Path, report: &mut ValidationReport) {
        let source = relative_display(file, self.root);
        match fs::read_to_string(file) {
            Ok(content) => self.check_content(&source, &content, report),
            Err(e) => report.add_diagnostic(&source, format!("Error reading file: {e}")),
        }
    }

    /// Record the broken links found in `content` under `source`.
    pub fn check_content(&self, source: &str, content: &str, report: &mut ValidationReport) {
        for link in extract_internal_links(content) {
            if link.is_exempt(self.skip_substrings) {
                continue;
            }

            let path = link.path();
            if path.is_empty() {
                continue;
            }

            let resolution = self.resolver.resolve(path);
            if resolution.is_valid()
                && let Some(anchor) = link.anchor()
            {
                debug!("links"; "{}: anchor #{} on {} not checked", source, anchor, path);
            }

            let (issue, category) = match resolution {
                Resolution::Found => continue,
                Resolution::Redirected { to } => {
                    debug!("links"; "{}: {} -> {}", source, path, to);
                    continue;
                }
                Resolution::BrokenRedirect { to } => (
                    format!("Redirect destination not found: {path} -> {to}"),
                    IssueCategory::BrokenRedirect,
                ),
                Resolution::NotFound => (
                    format!("Path not found: {path}"),
                    IssueCategory::BrokenLink,
                ),
            };

            report.add_broken(
                source,
                BrokenLink {
                    label: link.label,
                    target: link.target,
                    issue,
                    category,
                },
            );
        }
    }
}
