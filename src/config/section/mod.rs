//! Configuration section definitions.

mod links;
mod urls;

pub use links::{ConflictLevel, LinksConfig};
pub use urls::UrlsConfig;
