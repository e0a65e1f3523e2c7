//! Link resolution against the path index and redirect table.

use super::{PathIndex, RedirectTable};
use crate::core::UrlPath;

/// Outcome of resolving one normalized link path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path exists in the index.
    Found,
    /// Path redirects to an existing destination.
    Redirected { to: UrlPath },
    /// Path redirects, but the destination does not exist.
    BrokenRedirect { to: UrlPath },
    /// Path neither exists nor redirects.
    NotFound,
}

impl Resolution {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Found | Self::Redirected { .. })
    }
}

/// Read-only view over both lookup tables.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a PathIndex,
    redirects: &'a RedirectTable,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a PathIndex, redirects: &'a RedirectTable) -> Self {
        Self { index, redirects }
    }

    /// Resolve a normalized path: index first, then one redirect hop.
    pub fn resolve(&self, path: &str) -> Resolution {
        if self.index.contains(path) {
            return Resolution::Found;
        }

        // An empty destination counts as no redirect at all
        match self.redirects.resolve(path).filter(|d| !d.is_empty()) {
            Some(destination) => {
                let to = UrlPath::from_link(&destination);
                if self.index.contains(to.as_str()) {
                    Resolution::Redirected { to }
                } else {
                    Resolution::BrokenRedirect { to }
                }
            }
            None => Resolution::NotFound,
        }
    }
}
