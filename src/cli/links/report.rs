//! Link validation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::{plural_count, plural_s};

/// Why a link failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    /// Path neither exists nor redirects.
    BrokenLink,
    /// Path redirects to a destination that does not exist.
    BrokenRedirect,
}

impl IssueCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrokenLink => "broken_link",
            Self::BrokenRedirect => "broken_redirect",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Link text.
    pub label: String,
    /// Raw link target as written in the document.
    pub target: String,
    /// Human-readable description.
    pub issue: String,
    pub category: IssueCategory,
}

/// One entry under a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Plain diagnostic, e.g. the document could not be read.
    Diagnostic(String),
    Broken(BrokenLink),
}

/// Per-document issues, keyed by path relative to the root.
///
/// Built independently per worker and merged, so the final content does not
/// depend on scan order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    files: BTreeMap<String, Vec<Issue>>,
}

impl ValidationReport {
    /// Add a plain diagnostic for a document.
    pub fn add_diagnostic(&mut self, source: &str, message: String) {
        self.push(source, Issue::Diagnostic(message));
    }

    /// Add a broken link for a document.
    pub fn add_broken(&mut self, source: &str, link: BrokenLink) {
        self.push(source, Issue::Broken(link));
    }

    fn push(&mut self, source: &str, issue: Issue) {
        self.files
            .entry(source.to_string())
            .or_default()
            .push(issue);
    }

    /// Combine two partial reports.
    pub fn merge(mut self, other: Self) -> Self {
        for (source, issues) in other.files {
            self.files.entry(source).or_default().extend(issues);
        }
        self
    }

    /// Issues recorded for one document.
    #[cfg(test)]
    pub fn issues(&self, source: &str) -> &[Issue] {
        self.files.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    /// Count of documents with at least one issue.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total issue count.
    pub fn issue_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Count of broken links in a category.
    pub fn count(&self, category: IssueCategory) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|i| matches!(i, Issue::Broken(b) if b.category == category))
            .count()
    }

    /// Per-category counts, e.g. `2 broken_link, 1 broken_redirect`.
    /// Categories without entries are left out.
    pub fn breakdown(&self) -> String {
        [IssueCategory::BrokenLink, IssueCategory::BrokenRedirect]
            .into_iter()
            .filter_map(|category| match self.count(category) {
                0 => None,
                n => Some(format!("{n} {category}")),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True when no document has any entry.
    pub fn is_success(&self) -> bool {
        self.files.is_empty()
    }

    /// Print the full report to stdout.
    pub fn print(&self) {
        if self.files.is_empty() {
            return;
        }
        println!();

        let file_count = self.file_count();
        let issue_count = self.issue_count();
        let breakdown = self.breakdown();
        let detail = if breakdown.is_empty() {
            String::new()
        } else {
            format!(": {breakdown}")
        };
        println!(
            "{} {}",
            "broken links".red().bold(),
            format!(
                "({file_count} file{}, {issue_count} error{}{detail})",
                plural_s(file_count),
                plural_s(issue_count)
            )
            .dimmed()
        );

        for (path, issues) in &self.files {
            println!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for issue in issues {
                match issue {
                    Issue::Diagnostic(message) => println!("{} {}", "→".red(), message),
                    Issue::Broken(link) => {
                        println!("{} [{}]({})", "→".red(), link.label, link.target);
                        println!(
                            "  {} {}",
                            format!("{}:", link.category).dimmed(),
                            link.issue
                        );
                    }
                }
            }
        }
        println!();
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(f, "{}", "no broken links found".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                plural_count(self.issue_count(), "error").red().bold(),
                format!("in {}", plural_count(self.file_count(), "file")).dimmed()
            )
        }
    }
}
