//! Run configuration: CLI arguments layered over an optional TOML file.
//!
//! [`Config`] is resolved once at startup and never mutated afterwards.
//! Precedence is CLI, then config file, then built-in defaults.
pub mod discovery;
pub mod file;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::cli::Cli;
use crate::error::ConfigurationError;
use file::ConfigFile;

/// Directory searched for dotfiles when none are given explicitly.
pub const DEFAULT_DOTFILES_DIR: &str = "dotfiles";

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Environment variables consulted, in order, for the install location.
#[cfg(windows)]
pub const HOME_VARS: &[&str] = &["USERPROFILE", "HOME"];
/// Environment variables consulted, in order, for the install location.
#[cfg(not(windows))]
pub const HOME_VARS: &[&str] = &["HOME"];

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit dotfiles to link, in order; empty means discover.
    pub dotfiles: Vec<PathBuf>,
    /// Explicit output directory; `None` means use the home directory.
    pub output_dir: Option<PathBuf>,
    /// Diagnostic verbosity name as given by the user.
    pub log_level: String,
    /// Replace occupied destinations.
    pub overwrite: bool,
    /// Directory searched for dotfiles when `dotfiles` is empty.
    pub dotfiles_dir: PathBuf,
    /// Report what would change without touching the filesystem.
    pub dry_run: bool,
    /// Extra names skipped during discovery.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dotfiles: Vec::new(),
            output_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            dotfiles_dir: PathBuf::from(DEFAULT_DOTFILES_DIR),
            dry_run: false,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Layer CLI arguments over the values read from a config file.
    #[must_use]
    pub fn resolve(cli: &Cli, file: ConfigFile) -> Self {
        let defaults = Self::default();
        let dotfiles = if cli.dotfiles.is_empty() {
            file.dotfiles
        } else {
            cli.dotfiles.clone()
        };

        Self {
            dotfiles,
            output_dir: cli.output_dir.clone().or(file.output_dir),
            log_level: cli
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            overwrite: cli.overwrite || file.overwrite.unwrap_or(defaults.overwrite),
            dotfiles_dir: cli
                .dotfiles_dir
                .clone()
                .or(file.dotfiles_dir)
                .unwrap_or(defaults.dotfiles_dir),
            dry_run: cli.dry_run,
            exclude: file.exclude,
        }
    }

    /// Parse [`Config::log_level`]; `None` if the name is not recognised.
    #[must_use]
    pub fn level(&self) -> Option<LogLevel> {
        self.log_level.parse().ok()
    }
}

/// Diagnostic verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Every decision, including discovery details.
    Debug,
    /// One line per link attempt.
    #[default]
    Info,
    /// Overwrites, conflicts and failures only.
    Warning,
    /// Conflicts and failures only.
    Error,
    /// Alias of [`LogLevel::Error`].
    Critical,
}

impl LogLevel {
    /// The console filter this level maps to.
    #[must_use]
    pub const fn as_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Resolve the directory links are created in.
///
/// An explicit directory is used verbatim without checking that it exists.
/// Otherwise the first non-empty variable in [`HOME_VARS`] is used, looked up
/// through `lookup` (normally [`std::env::var_os`]).
///
/// # Errors
///
/// Returns [`ConfigurationError::NoInstallLocation`] when no explicit
/// directory is given and every home variable is unset or empty.
pub fn resolve_output_dir(
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf, ConfigurationError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    HOME_VARS
        .iter()
        .find_map(|var| lookup(var).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .ok_or(ConfigurationError::NoInstallLocation {
            var: HOME_VARS.first().copied().unwrap_or("HOME"),
        })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn explicit_output_dir_used_verbatim() {
        let dir = resolve_output_dir(Some(Path::new("/does/not/exist")), no_env).unwrap();
        assert_eq!(dir, PathBuf::from("/does/not/exist"));
    }

    #[test]
    fn output_dir_falls_back_to_home() {
        let dir = resolve_output_dir(None, |var| {
            HOME_VARS
                .contains(&var)
                .then(|| OsString::from("/home/test"))
        })
        .unwrap();
        assert_eq!(dir, PathBuf::from("/home/test"));
    }

    #[test]
    fn unset_home_is_configuration_error() {
        let err = resolve_output_dir(None, no_env).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoInstallLocation { .. }));
    }

    #[test]
    fn empty_home_is_configuration_error() {
        let err = resolve_output_dir(None, |_| Some(OsString::new())).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoInstallLocation { .. }));
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("CRITICAL".parse::<LogLevel>(), Ok(LogLevel::Critical));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LogLevel::Debug.as_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Warning.as_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Critical.as_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let cli = Cli::parse_from(["dotfiles-deploy"]);
        let config = Config::resolve(&cli, ConfigFile::default());
        assert_eq!(config, Config::default());
        assert_eq!(config.level(), Some(LogLevel::Info));
    }

    #[test]
    fn cli_overrides_config_file() {
        let cli = Cli::parse_from([
            "dotfiles-deploy",
            "--output-dir",
            "/cli/home",
            "--log-level",
            "DEBUG",
            "./cfg/.bashrc",
        ]);
        let file = ConfigFile {
            output_dir: Some(PathBuf::from("/file/home")),
            log_level: Some("ERROR".to_string()),
            dotfiles: vec![PathBuf::from("dotfiles/.zshrc")],
            ..ConfigFile::default()
        };
        let config = Config::resolve(&cli, file);
        assert_eq!(config.output_dir, Some(PathBuf::from("/cli/home")));
        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.dotfiles, vec![PathBuf::from("./cfg/.bashrc")]);
    }

    #[test]
    fn config_file_fills_missing_flags() {
        let cli = Cli::parse_from(["dotfiles-deploy"]);
        let file = ConfigFile {
            output_dir: Some(PathBuf::from("/file/home")),
            dotfiles_dir: Some(PathBuf::from("/repo/home")),
            overwrite: Some(true),
            exclude: vec![".DS_Store".to_string()],
            ..ConfigFile::default()
        };
        let config = Config::resolve(&cli, file);
        assert_eq!(config.output_dir, Some(PathBuf::from("/file/home")));
        assert_eq!(config.dotfiles_dir, PathBuf::from("/repo/home"));
        assert!(config.overwrite);
        assert_eq!(config.exclude, vec![".DS_Store".to_string()]);
    }

    #[test]
    fn unknown_level_is_reported_as_none() {
        let cli = Cli::parse_from(["dotfiles-deploy", "--log-level", "LOUD"]);
        let config = Config::resolve(&cli, ConfigFile::default());
        assert_eq!(config.level(), None);
    }
}
