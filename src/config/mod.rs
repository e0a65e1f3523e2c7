//! Tool configuration management for `docsweep.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── links      # [links]
//! │   └── urls       # [urls]
//! ├── error          # ConfigError, ConfigDiagnostics
//! ├── util           # config file discovery
//! └── mod.rs         # ToolConfig (this file)
//! ```
//!
//! The config file is optional: every field has a default matching the
//! documentation site the tool was written for.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{ConflictLevel, LinksConfig, UrlsConfig};

use util::find_config_file;

use crate::cli::{Cli, Commands};
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file searched for when `--config` is not given.
const DEFAULT_CONFIG: &str = "docsweep.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docsweep.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Project root directory - parent of config file or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Link validator settings
    #[serde(default)]
    pub links: LinksConfig,

    /// Url existence checker settings
    #[serde(default)]
    pub urls: UrlsConfig,
}

impl ToolConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from the working directory (or `--root`) for the
    /// config file. The project root is the config file's parent directory,
    /// or the start directory when no config file exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let root_override = match &cli.command {
            Commands::Links(args) => args.root.as_ref().map(|r| cwd.join(r)),
            Commands::Urls(_) => None,
        };
        let start = root_override.clone().unwrap_or_else(|| cwd.clone());
        let config_name = cli.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG));

        let mut config = match find_config_file(&start, config_name) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config
            }
            // An explicitly requested config must exist
            None if cli.config.is_some() => {
                bail!("config file `{}` not found", config_name.display())
            }
            None => {
                debug!("config"; "{} not found, using defaults", DEFAULT_CONFIG);
                Self {
                    root: start,
                    ..Self::default()
                }
            }
        };

        if let Some(root) = root_override {
            config.root = root;
        }
        config.apply_command_options(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Apply command-line overrides on top of the file values.
    ///
    /// Paths given on the command line are relative to `cwd`, not the root.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        if let Commands::Urls(args) = &cli.command {
            if let Some(file) = &args.file {
                self.urls.file = cwd.join(file);
            }
            if let Some(concurrency) = args.concurrency {
                self.urls.concurrency = concurrency;
            }
        }
    }

    /// Read and parse a config file, warning about keys nothing reads.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;
        for key in &ignored {
            log!("warning"; "{}: unknown key `{}` ignored", path.display(), key);
        }
        Ok(config)
    }

    /// Parse TOML, returning the dotted paths of unrecognized keys alongside.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let config = serde_ignored::deserialize(toml::Deserializer::new(content), |key| {
            ignored.push(key.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.links.validate(&mut diag);
        self.urls.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

/// Parse a config snippet for tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ToolConfig {
    let (parsed, ignored) = ToolConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_invalid_toml() {
        let result = ToolConfig::parse_with_ignored("[links\nwildcard = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = ToolConfig::parse_with_ignored("[urls]\ntimeout = \"soon\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_top_level_section() {
        let (_, ignored) = ToolConfig::parse_with_ignored("[deploy]\nforce = true").unwrap();
        assert_eq!(ignored, vec!["deploy".to_string()]);
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docsweep.toml");
        fs::write(&path, "[urls]\ntimeout = 9\n").unwrap();
        let config = ToolConfig::from_path(&path).unwrap();
        assert_eq!(config.urls.timeout, 9);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ToolConfig::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_validate_rejects_bad_sections() {
        let config = test_parse_config("[urls]\ntimeout = 0");
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("urls.timeout"));
    }

    #[test]
    fn test_root_join() {
        let config = ToolConfig {
            root: PathBuf::from("/site"),
            ..ToolConfig::default()
        };
        assert_eq!(config.root_join("docs.json"), PathBuf::from("/site/docs.json"));
        assert_eq!(config.root_join("/abs/x.csv"), PathBuf::from("/abs/x.csv"));
    }

    fn parse_cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::try_parse_from(std::iter::once("docsweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_load_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let missing = dir.path().join("custom.toml");
        let cli = parse_cli(&["-C", missing.to_str().unwrap(), "links", "-r", root]);

        let err = ToolConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[urls]
concurrency = 3
").unwrap();
        let cli = parse_cli(&["--config", path.to_str().unwrap(), "urls", "-j", "5"]);

        let config = ToolConfig::load(&cli).unwrap();
        assert_eq!(config.root, dir.path());
        // command line wins over the file
        assert_eq!(config.urls.concurrency, 5);
    }

    #[test]
    fn test_load_without_config_uses_root() {
        let dir = TempDir::new().unwrap();
        let cli = parse_cli(&["links", "--root", dir.path().to_str().unwrap()]);
        let config = ToolConfig::load(&cli).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.links.wildcard, ":slug*");
    }
}
