//! Site address space - which paths exist and where redirects lead.
//!
//! Built once per run, read-only afterwards.
//!
//! # Architecture
//!
//! ```text
//! Source Files                    Path Index
//! ============                   ==========
//! guides/setup.mdx          <->   /guides/setup
//! images/logo.png           <->   /images/logo.png
//!
//! docs.json redirects             Redirect Table
//! ===================             ==============
//! /old          -> /new           exact lookup
//! /old/:slug*   -> /new/:slug*    first wildcard match in table order
//! ```
//!
//! # Module Structure
//!
//! - [`conflict`]: path collision detection (multiple files -> same path)
//! - [`redirect`]: redirect table loading and wildcard resolution
//! - [`resolve`]: link resolution against index + redirects
//! - [`space`]: path index construction

pub mod conflict;
mod redirect;
mod resolve;
mod space;

pub use redirect::RedirectTable;
pub use resolve::{Resolution, Resolver};
pub use space::PathIndex;
