use clap::Parser;
use std::path::PathBuf;

/// Version string stamped by `build.rs`, falling back to the crate version.
pub const VERSION: &str = match option_env!("DOTFILES_DEPLOY_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Symlink dotfiles into a home directory.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles-deploy",
    about = "Symlink dotfiles into a home directory",
    version = VERSION
)]
pub struct Cli {
    /// Files to create symlinks for. If omitted, every dotfile in
    /// --dotfiles-dir is linked
    pub dotfiles: Vec<PathBuf>,

    /// Directory to create symlinks in. If omitted, $HOME is used
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Diagnostic verbosity (DEBUG, INFO, WARNING, ERROR, CRITICAL) [default: INFO]
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Replace files that already exist at the destination
    #[arg(long)]
    pub overwrite: bool,

    /// Directory searched for dotfiles when none are given [default: dotfiles]
    #[arg(long, value_name = "DIR")]
    pub dotfiles_dir: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// TOML config file
    #[arg(short, long, value_name = "FILE", env = "DOTFILES_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,
}
