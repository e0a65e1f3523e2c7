//! Core types - pure abstractions shared across the codebase.

mod link;
mod url;

pub use link::split_anchor;
pub use url::{UrlPath, normalize_path};
