//! Redirect table loaded from the site config (`docs.json`).
//!
//! ```json
//! {
//!   "redirects": [
//!     { "source": "/old", "destination": "/new" },
//!     { "source": "/experiments-plus/:slug*", "destination": "/experiments/:slug*" }
//!   ]
//! }
//! ```
//!
//! Exact sources are looked up first. Otherwise wildcard rules are tried in
//! table order and the first match wins; the captured suffix replaces the
//! token in the destination.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::utils::plural_s;
use crate::{debug, log};

/// Redirect table loading errors
#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid redirects in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// On-disk shape of the site config; everything but `redirects` is ignored.
#[derive(Debug, Default, Deserialize)]
struct SiteConfigFile {
    #[serde(default)]
    redirects: Vec<RawRedirect>,
}

#[derive(Debug, Deserialize)]
struct RawRedirect {
    source: String,
    destination: String,
}

/// A single redirect rule.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    /// Anchored matcher, present only for wildcard sources.
    matcher: Option<Regex>,
    /// Literal text before the wildcard token (for overlap detection).
    prefix: Option<String>,
}

impl RedirectRule {
    /// Whether the source contains the wildcard token.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.matcher.is_some()
    }
}

/// Ordered, immutable redirect rules.
#[derive(Debug, Clone)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
    exact: FxHashMap<String, usize>,
    token: String,
    warnings: Vec<String>,
}

impl RedirectTable {
    /// Create an empty table for the given wildcard token.
    pub fn empty(token: &str) -> Self {
        Self {
            rules: Vec::new(),
            exact: FxHashMap::default(),
            token: token.to_string(),
            warnings: Vec::new(),
        }
    }

    /// Load redirects, degrading to an empty table on any error.
    pub fn load(path: &Path, token: &str) -> Self {
        match Self::try_load(path, token) {
            Ok(table) => {
                for warning in table.warnings() {
                    log!("warning"; "{}", warning);
                }
                table
            }
            Err(e) => {
                let cause = std::error::Error::source(&e)
                    .map(|s| format!(": {s}"))
                    .unwrap_or_default();
                log!("warning"; "could not load redirects, {}{}", e, cause);
                Self::empty(token)
            }
        }
    }

    /// Load redirects from a JSON site config.
    pub fn try_load(path: &Path, token: &str) -> Result<Self, RedirectError> {
        let content =
            fs::read_to_string(path).map_err(|e| RedirectError::Io(path.to_path_buf(), e))?;
        let parsed: SiteConfigFile = serde_json::from_str(&content)
            .map_err(|e| RedirectError::Json(path.to_path_buf(), e))?;
        Ok(Self::from_rules(
            parsed
                .redirects
                .into_iter()
                .map(|r| (r.source, r.destination)),
            token,
        ))
    }

    /// Build a table from `(source, destination)` pairs in order.
    ///
    /// A repeated source keeps its first position and takes the last
    /// destination. Sources with more than one token are rejected.
    pub fn from_rules(
        rules: impl IntoIterator<Item = (String, String)>,
        token: &str,
    ) -> Self {
        let mut table = Self::empty(token);

        for (source, destination) in rules {
            if let Some(&idx) = table.exact.get(&source) {
                debug!("redirect"; "duplicate source {}, now -> {}", source, destination);
                table.rules[idx].destination = destination;
                continue;
            }

            let (matcher, prefix) = match source.matches(token).count() {
                0 => (None, None),
                1 => match wildcard_matcher(&source, token) {
                    Ok(found) => found,
                    Err(e) => {
                        table
                            .warnings
                            .push(format!("skipping redirect `{source}`: {e}"));
                        continue;
                    }
                },
                n => {
                    table.warnings.push(format!(
                        "skipping redirect `{source}`: {n} `{token}` tokens, only one is supported"
                    ));
                    continue;
                }
            };

            table.exact.insert(source.clone(), table.rules.len());
            table.rules.push(RedirectRule {
                source,
                destination,
                matcher,
                prefix,
            });
        }

        table.check_overlaps();
        table
    }

    /// Warn about wildcard rules whose literal prefixes overlap.
    ///
    /// Resolution stays first-match in table order; the warning only points
    /// out that a later rule may be shadowed.
    fn check_overlaps(&mut self) {
        let wildcards: Vec<_> = self
            .rules
            .iter()
            .filter_map(|r| r.prefix.as_deref().map(|p| (p, r.source.as_str())))
            .collect();

        let mut warnings = Vec::new();
        for (i, (prefix_a, source_a)) in wildcards.iter().enumerate() {
            for (prefix_b, source_b) in &wildcards[i + 1..] {
                if prefix_a.starts_with(prefix_b) || prefix_b.starts_with(prefix_a) {
                    warnings.push(format!(
                        "wildcard redirects overlap: `{source_a}` and `{source_b}` (first listed wins)"
                    ));
                }
            }
        }
        self.warnings.extend(warnings);
    }

    /// Resolve a normalized path through the table.
    ///
    /// Returns the destination exactly as written after token substitution;
    /// the caller normalizes it.
    pub fn resolve(&self, path: &str) -> Option<String> {
        if let Some(&idx) = self.exact.get(path) {
            return Some(self.rules[idx].destination.clone());
        }

        self.rules.iter().find_map(|rule| {
            let captured = rule.matcher.as_ref()?.captures(path)?.get(1)?.as_str();
            Some(rule.destination.replace(&self.token, captured))
        })
    }

    /// Rules in table order.
    #[cfg(test)]
    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// Problems noticed while building the table.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of wildcard rules.
    pub fn wildcard_count(&self) -> usize {
        self.rules.iter().filter(|r| r.is_wildcard()).count()
    }

    /// Short summary for logging, e.g. `12 redirects (3 wildcard)`.
    pub fn summary(&self) -> String {
        let wildcards = self.wildcard_count();
        if self.is_empty() {
            "no redirects".to_string()
        } else if wildcards == 0 {
            format!("{} redirect{}", self.len(), plural_s(self.len()))
        } else {
            format!(
                "{} redirect{} ({} wildcard)",
                self.len(),
                plural_s(self.len()),
                wildcards
            )
        }
    }
}

/// Build `^<prefix>(.+)<suffix>$` for a source holding exactly one token.
fn wildcard_matcher(
    source: &str,
    token: &str,
) -> Result<(Option<Regex>, Option<String>), regex::Error> {
    let (prefix, suffix) = source.split_once(token).unwrap_or((source, ""));
    let pattern = format!("^{}(.+){}$", regex::escape(prefix), regex::escape(suffix));
    Ok((Some(Regex::new(&pattern)?), Some(prefix.to_string())))
}
