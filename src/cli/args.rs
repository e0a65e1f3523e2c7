//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Documentation maintenance toolkit
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path. Without it, docsweep.toml is searched upward and is optional
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate internal links in the documentation tree
    #[command(visible_alias = "l")]
    Links(LinksArgs),

    /// Check which legacy urls still exist on the target site
    #[command(visible_alias = "u")]
    Urls(UrlsArgs),
}

/// Links command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LinksArgs {
    /// Documents to check. If omitted, checks every document under the root.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Documentation root (default: config file directory, else cwd)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Treat broken links as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}

/// Urls command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct UrlsArgs {
    /// CSV table to check and rewrite
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Run the checks but leave the table untouched
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Maximum number of requests in flight
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
}
