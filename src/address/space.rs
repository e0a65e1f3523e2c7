//! Path index: every path that currently exists on the site.
//!
//! Documents are registered without their extension, static assets with it:
//!
//! ```text
//! guides/setup.mdx  -> /guides/setup
//! images/logo.png   -> /images/logo.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use super::conflict::{UrlConflict, UrlSourceMap, detect_conflicts};
use crate::config::LinksConfig;
use crate::core::UrlPath;
use crate::utils::path::has_extension;

/// What an indexed path is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Document,
    Asset,
}

/// Mapping from normalized path to the kind of file behind it.
#[derive(Debug, Default)]
pub struct PathIndex {
    entries: FxHashMap<UrlPath, EntryKind>,
    documents: Vec<PathBuf>,
    conflicts: Vec<UrlConflict>,
}

impl PathIndex {
    /// Walk `root` and index every document and static asset.
    ///
    /// Fails only when the root itself cannot be enumerated.
    pub fn build(root: &Path, config: &LinksConfig) -> Result<Self> {
        fs::read_dir(root)
            .with_context(|| format!("cannot read documentation root `{}`", root.display()))?;
        Ok(Self::from_files(root, collect_files(root, config), config))
    }

    /// Index an explicit file list (absolute paths under `root`).
    ///
    /// Documents are registered before assets, each group in sorted order.
    /// When two files claim the same path the last registration wins and a
    /// conflict is recorded.
    pub fn from_files(root: &Path, mut files: Vec<PathBuf>, config: &LinksConfig) -> Self {
        files.sort();

        let mut sources = UrlSourceMap::default();
        let mut entries = FxHashMap::default();
        let mut documents = Vec::new();

        let mut register = |url: UrlPath, source: &Path, kind: EntryKind| {
            sources
                .entry(url.clone())
                .or_default()
                .push(source.to_path_buf());
            entries.insert(url, kind);
        };

        for file in &files {
            if has_extension(file, &config.extensions) {
                let rel = file.strip_prefix(root).unwrap_or(file);
                register(UrlPath::from_document(rel), file, EntryKind::Document);
                documents.push(file.clone());
            }
        }

        for file in &files {
            if has_extension(file, &config.static_extensions) {
                let rel = file.strip_prefix(root).unwrap_or(file);
                register(UrlPath::from_asset(rel), file, EntryKind::Asset);
            }
        }

        Self {
            entries,
            documents,
            conflicts: detect_conflicts(&sources, root),
        }
    }

    /// Check whether a normalized path exists.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    #[cfg(test)]
    fn kind(&self, path: &str) -> Option<EntryKind> {
        self.entries.get(path).copied()
    }

    /// All document files found, sorted.
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    /// Number of paths served by documents.
    pub fn document_count(&self) -> usize {
        self.count(EntryKind::Document)
    }

    /// Number of paths served by static assets.
    pub fn asset_count(&self) -> usize {
        self.count(EntryKind::Asset)
    }

    fn count(&self, kind: EntryKind) -> usize {
        self.entries.values().filter(|k| **k == kind).count()
    }

    /// Paths claimed by more than one file.
    pub fn conflicts(&self) -> &[UrlConflict] {
        &self.conflicts
    }
}

/// Collect all files under `dir`, honoring `skip_hidden` and `ignore_dirs`.
fn collect_files(dir: &Path, config: &LinksConfig) -> Vec<PathBuf> {
    let ignore_dirs = config.ignore_dirs.clone();
    WalkDir::new(dir)
        .skip_hidden(config.skip_hidden)
        .process_read_dir(move |_, _, _, children| {
            children.retain(|entry| {
                entry.as_ref().map_or(true, |e| {
                    !(e.file_type().is_dir()
                        && e.file_name()
                            .to_str()
                            .is_some_and(|name| ignore_dirs.iter().any(|d| d == name)))
                })
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect()
}
