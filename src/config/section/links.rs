//! `[links]` section configuration.
//!
//! Configuration for the `docsweep links` command.
//!
//! # Example
//!
//! ```toml
//! [links]
//! docs_config = "docs.json"        # Redirect table, relative to root
//! extensions = ["mdx"]             # Document extensions
//! static_extensions = ["png", "svg", "pdf"]
//! skip_substrings = ["console-api"]
//! wildcard = ":slug*"              # Redirect capture token
//! conflicts = "warn"               # Path collisions: warn | error
//! skip_hidden = false              # Leave out dot-directories and dot-files
//! ignore_dirs = ["node_modules"]   # Directory names never descended into
//! ```
//!
//! By default every file under the root is indexed, hidden ones included.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Site config holding the `redirects` array.
    pub docs_config: PathBuf,

    /// Extensions of markup documents (scanned and indexed as pages).
    pub extensions: Vec<String>,

    /// Extensions of static assets indexed with their extension kept.
    pub static_extensions: Vec<String>,

    /// Link targets containing any of these are never checked.
    pub skip_substrings: Vec<String>,

    /// Wildcard capture token recognized in redirect rules.
    pub wildcard: String,

    /// How to treat two files claiming the same path.
    pub conflicts: ConflictLevel,

    /// Skip entries whose name starts with `.` while walking the root.
    pub skip_hidden: bool,

    /// Directory names pruned from the walk.
    pub ignore_dirs: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            docs_config: PathBuf::from("docs.json"),
            extensions: vec!["mdx".into()],
            static_extensions: [
                "png", "jpg", "jpeg", "gif", "svg", "webp", "mp4", "pdf", "json", "csv",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            skip_substrings: vec!["console-api".into()],
            wildcard: ":slug*".into(),
            conflicts: ConflictLevel::default(),
            skip_hidden: false,
            ignore_dirs: Vec::new(),
        }
    }
}

impl LinksConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                "links.extensions",
                "at least one document extension is required",
                "extensions = [\"mdx\"]",
            );
        }
        if self.wildcard.is_empty() {
            diag.error_with_hint(
                "links.wildcard",
                "wildcard token must not be empty",
                "wildcard = \":slug*\"",
            );
        }
        if self.skip_substrings.iter().any(String::is_empty) {
            diag.error(
                "links.skip_substrings",
                "empty entry would skip every link",
            );
        }
    }
}

/// Path collision handling.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConflictLevel {
    /// Report collisions, last registration wins.
    #[default]
    Warn,
    /// Abort before scanning.
    Error,
}
