use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GitSemverError, Result};

/// File name looked up in the repository location.
pub const CONFIG_FILE_NAME: &str = "gitsemver.toml";

/// Represents the complete configuration for git-semver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Manifest stamped during sync, relative to the repository location
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    #[serde(default = "default_initial_tag")]
    pub initial_tag: String,

    #[serde(default = "default_initial_tag_message")]
    pub initial_tag_message: String,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_initial_tag() -> String {
    "0.0.0".to_string()
}

fn default_initial_tag_message() -> String {
    "git-semver auto-created initial tag".to_string()
}

/// Shell commands run around a sync.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Run after the version is stamped into the manifest (e.g. `npm update`)
    #[serde(default)]
    pub post_stamp: Vec<String>,

    /// Run after local changes were published (e.g. `npm publish`)
    #[serde(default)]
    pub post_sync: Vec<String>,
}

/// Configuration for listing output.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_tag_count")]
    pub tag_count: usize,

    /// Commits shown by `log`; defaults to the terminal height
    #[serde(default)]
    pub log_count: Option<usize>,
}

fn default_tag_count() -> usize {
    10
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            tag_count: default_tag_count(),
            log_count: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: None,
            initial_tag: default_initial_tag(),
            initial_tag_message: default_initial_tag_message(),
            hooks: HooksConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// The configured manifest resolved against `location`.
    pub fn manifest_path(&self, location: &Path) -> Option<PathBuf> {
        self.manifest.as_ref().map(|m| location.join(m))
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| GitSemverError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemver.toml` in the repository location
/// 3. `.gitsemver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, location: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if location.join(CONFIG_FILE_NAME).exists() {
        Some(location.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|path| path.exists())
    };

    let Some(path) = candidate else {
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        GitSemverError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    parse_config(&text)
}
