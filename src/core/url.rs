//! URL path type for type-safe path index keys.
//!
//! Invariants:
//! - No trailing slash, except for the root path `/`
//! - Documents and assets always start with `/`; redirect destinations are
//!   kept as written apart from trailing slash removal

use std::borrow::Borrow;
use std::path::{Component, Path};
use std::sync::Arc;

/// Strip trailing slashes from a link path, keeping the root `/` intact.
///
/// Idempotent: `normalize_path(normalize_path(p)) == normalize_path(p)`.
#[inline]
pub fn normalize_path(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Normalized site path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Create from a link target or redirect destination (trailing slash removed).
    pub fn from_link(path: &str) -> Self {
        Self(Arc::from(normalize_path(path)))
    }

    /// Create document URL: `guides/setup.mdx` -> `/guides/setup`.
    pub fn from_document(rel: &Path) -> Self {
        Self::from_segments(&rel.with_extension(""))
    }

    /// Create asset URL, extension kept: `img/logo.png` -> `/img/logo.png`.
    pub fn from_asset(rel: &Path) -> Self {
        Self::from_segments(rel)
    }

    /// Join relative path components with `/` regardless of platform separator.
    fn from_segments(rel: &Path) -> Self {
        let segments: Vec<_> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();
        Self(Arc::from(format!("/{}", segments.join("/"))))
    }

    /// Get the URL path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UrlPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UrlPath {
    fn from(s: &str) -> Self {
        Self::from_link(s)
    }
}

impl PartialEq<str> for UrlPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}
