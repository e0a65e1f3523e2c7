//! Command-line interface and command drivers.

mod args;
pub mod links;
pub mod urls;

pub use args::{Cli, Commands, LinksArgs, UrlsArgs};
