//! Settings for the tagconf tool itself
//!
//! Stored as TOML in the platform config directory
//! (`~/.config/tagconf/config.toml` on Linux), or wherever
//! `TAGCONF_CONFIG` / `--config` points.
//!
//! ```toml
//! default_format = "json"
//!
//! [store]
//! write_comments = true
//! max_reported_errors = 5
//! hex_prefix = "strict"
//! component_errors = "per_component"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::options::StoreOptions;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Format used when `--format` is not given
    pub default_format: OutputFormat,

    /// Options for every store the tool opens
    pub store: StoreOptions,
}

impl Settings {
    /// Returns the default settings file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tagconf", "tagconf")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads settings from `path`, or the default location when `None`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load settings: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SettingsError::Parse(e.to_string()))
            .context("Failed to parse settings")
    }
}
