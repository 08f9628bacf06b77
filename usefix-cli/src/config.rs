//! Configuration file loading for usefix.
//!
//! Discovers and loads `usefix.toml` from the working directory, or from an explicit
//! `--config` path. Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "usefix.toml";

/// Top-level configuration from usefix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsefixConfig {
    pub output: OutputConfig,
    pub check: CheckConfig,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendering used by `usefix check` when `--format` is not given.
    pub format: OutputFormat,
}

/// Check section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Exit with code 2 when a fixup is produced.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Md,
    Json,
}

/// Discover the usefix.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a usefix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<UsefixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<UsefixConfig> {
    let config: UsefixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<UsefixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(UsefixConfig::default()),
    }
}

/// An explicit path must exist; otherwise fall back to discovery in `dir`.
pub fn resolve(explicit: Option<&Utf8Path>, dir: &Utf8Path) -> anyhow::Result<UsefixConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => load_or_default(dir),
    }
}

/// Settings in effect for one `usefix check` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergedConfig {
    pub format: OutputFormat,
    pub strict: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: UsefixConfig,
}

impl ConfigMerger {
    pub fn new(config: UsefixConfig) -> Self {
        Self { config }
    }

    /// `--format` replaces the configured format; `--strict` can only turn strict on.
    pub fn merge_check_args(
        self,
        cli_format: Option<OutputFormat>,
        cli_strict: bool,
    ) -> MergedConfig {
        MergedConfig {
            format: cli_format.unwrap_or(self.config.output.format),
            strict: cli_strict || self.config.check.strict,
        }
    }
}
