//! docsweep - maintenance checks for a documentation site.

mod address;
mod cli;
mod config;
mod core;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ToolConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ToolConfig::load(&cli)?;

    match &cli.command {
        Commands::Links(args) => {
            if !cli::links::validate_links(&config, args)? {
                std::process::exit(1);
            }
        }
        Commands::Urls(args) => {
            cli::urls::check_urls(&config, args)?;
        }
    }

    Ok(())
}
