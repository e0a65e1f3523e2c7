//! Small pure helpers shared by both commands.

pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
