//! Domain-specific error types for dotfile deployment.
//!
//! Internal modules return typed errors while `main` converts them to
//! [`anyhow::Error`] at the process boundary via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeployError
//! ├── Configuration(ConfigurationError)  # fatal, aborts before linking
//! ├── Conflict(ConflictError)            # destination occupied, entry skipped
//! └── LinkCreation(LinkCreationError)    # removal or symlink failed, entry failed
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a deployment run.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The run cannot start.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A single entry was skipped because its destination is occupied.
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// A single entry could not be linked.
    #[error("Link error: {0}")]
    LinkCreation(#[from] LinkCreationError),
}

/// Errors that prevent any linking from happening.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Neither `--output-dir` nor the home directory variable is available.
    #[error("no install location: ${var} is unset or empty, specify one with --output-dir")]
    NoInstallLocation {
        /// Name of the environment variable that was consulted.
        var: &'static str,
    },

    /// The directory searched for dotfiles could not be listed.
    #[error("cannot read dotfiles directory {}: {source}", .path.display())]
    DotfilesDir {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML configuration file could not be read or parsed.
    #[error("invalid config file {}: {message}", .path.display())]
    ConfigFile {
        /// Path to the configuration file.
        path: PathBuf,
        /// Human-readable reason.
        message: String,
    },
}

/// The destination is already occupied and overwrite was not requested.
#[derive(Error, Debug)]
#[error("{} already exists, will not replace it without --overwrite", .destination.display())]
pub struct ConflictError {
    /// The occupied destination path.
    pub destination: PathBuf,
}

/// Errors raised while replacing or creating a single link.
#[derive(Error, Debug)]
pub enum LinkCreationError {
    /// The source path has no final component to name the link after.
    #[error("source {} has no file name", .path.display())]
    InvalidSource {
        /// The offending source path.
        path: PathBuf,
    },

    /// The source path could not be made absolute.
    #[error("cannot resolve absolute path of {}: {source}", .path.display())]
    Absolute {
        /// The source path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The existing destination could not be removed before relinking.
    #[error("cannot remove existing {}: {source}", .destination.display())]
    RemoveExisting {
        /// The destination that should have been removed.
        destination: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The symbolic link itself could not be created.
    #[error("cannot create symlink {} -> {}: {source}", .destination.display(), .target.display())]
    Symlink {
        /// Where the link was to be created.
        destination: PathBuf,
        /// What the link was to point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
