//! Optional TOML configuration file.
//!
//! Every key is optional; anything left out falls through to the CLI
//! defaults. Unknown keys are rejected so typos surface immediately.
//!
//! ```toml
//! output_dir = "/home/me"
//! dotfiles_dir = "/home/me/src/dotfiles/dotfiles"
//! overwrite = true
//! log_level = "DEBUG"
//! exclude = [".DS_Store"]
//! ```
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Contents of a config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Dotfiles to link when none are given on the command line.
    pub dotfiles: Vec<PathBuf>,
    /// Directory to create links in.
    pub output_dir: Option<PathBuf>,
    /// Directory searched for dotfiles.
    pub dotfiles_dir: Option<PathBuf>,
    /// Replace occupied destinations.
    pub overwrite: Option<bool>,
    /// Diagnostic verbosity name.
    pub log_level: Option<String>,
    /// Extra names skipped during discovery.
    pub exclude: Vec<String>,
}

impl FromStr for ConfigFile {
    type Err = toml::de::Error;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        toml::from_str(data)
    }
}

/// Load the config file at `path`, or an empty config when `path` is `None`.
///
/// # Errors
///
/// Returns [`ConfigurationError::ConfigFile`] if the file cannot be read or
/// is not valid TOML for [`ConfigFile`].
pub fn load(path: Option<&Path>) -> Result<ConfigFile, ConfigurationError> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigurationError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    content
        .parse()
        .map_err(|e: toml::de::Error| ConfigurationError::ConfigFile {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
}
