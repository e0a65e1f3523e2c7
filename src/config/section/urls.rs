//! `[urls]` section configuration.
//!
//! Configuration for the `docsweep urls` command.
//!
//! # Example
//!
//! ```toml
//! [urls]
//! file = "old_docs_urls.csv"
//! url_column = "cleaned_url"
//! flag_column = "exists in mint docs"
//! legacy_host = "docs.statsig.com"
//! target = "https://statsig-4b2ff144.mintlify.app"
//! timeout = 2                       # Seconds per request
//! not_found_marker = "page not found"
//! concurrency = 8
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlsConfig {
    /// CSV table, rewritten in place.
    pub file: PathBuf,

    /// Column holding the legacy url.
    pub url_column: String,

    /// Column receiving the existence flag.
    pub flag_column: String,

    /// Host prefix removed from legacy urls.
    pub legacy_host: String,

    /// Origin the derived paths are requested from.
    pub target: String,

    /// Timeout for each request in seconds.
    pub timeout: u64,

    /// Page title fragment marking a missing page (case-insensitive).
    pub not_found_marker: String,

    /// Maximum number of requests in flight.
    pub concurrency: usize,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("old_docs_urls.csv"),
            url_column: "cleaned_url".into(),
            flag_column: "exists in mint docs".into(),
            legacy_host: "docs.statsig.com".into(),
            target: "https://statsig-4b2ff144.mintlify.app".into(),
            timeout: 2,
            not_found_marker: "page not found".into(),
            concurrency: 8,
        }
    }
}

impl UrlsConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.target) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => diag.error("urls.target", "target must be an http(s) origin"),
            Err(e) => diag.error_with_hint(
                "urls.target",
                format!("invalid url `{}`: {e}", self.target),
                "target = \"https://docs.example.com\"",
            ),
        }
        if self.timeout == 0 {
            diag.error("urls.timeout", "timeout must be at least 1 second");
        }
        if self.concurrency == 0 {
            diag.error("urls.concurrency", "concurrency must be at least 1");
        }
        if self.url_column.is_empty() || self.flag_column.is_empty() {
            diag.error("urls.url_column", "column names must not be empty");
        }
        if self.not_found_marker.is_empty() {
            diag.error(
                "urls.not_found_marker",
                "empty marker would flag every page as missing",
            );
        }
    }
}
