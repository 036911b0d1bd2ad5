use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;

use dotfiles_deploy::cli::Cli;
use dotfiles_deploy::config::{Config, DEFAULT_LOG_LEVEL, file};
use dotfiles_deploy::deploy;
use dotfiles_deploy::error::ConfigurationError;
use dotfiles_deploy::logging::{self, Logger};
use dotfiles_deploy::operations::SystemFileSystemOps;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let cli = Cli::parse();

    // The subscriber needs the log level, which may come from the config
    // file, so a bad file is only reported once logging is up.
    let (config_file, file_error) = match file::load(cli.config.as_deref()) {
        Ok(f) => (f, None),
        Err(e) => (file::ConfigFile::default(), Some(e)),
    };
    let config = Config::resolve(&cli, config_file);

    let level = config.level();
    let log_file = logging::log_file_path();
    logging::init_subscriber(level.unwrap_or_default().as_filter(), log_file.as_deref());
    let log = Logger::new(log_file);

    if level.is_none() {
        log.warn(&format!(
            "unknown log level '{}', using {DEFAULT_LOG_LEVEL}",
            config.log_level
        ));
    }

    match run(&config, file_error, &log) {
        Ok(code) => code,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, file_error: Option<ConfigurationError>, log: &Logger) -> Result<ExitCode> {
    if let Some(e) = file_error {
        return Err(e).context("cannot load configuration");
    }

    let stats = deploy::run(config, |var| std::env::var_os(var), log, &SystemFileSystemOps)
        .context("deployment aborted before linking")?;

    log.print_summary(&stats);

    if stats.has_failures() {
        log.debug(&format!("{} of {} dotfiles failed", stats.failed, stats.total()));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
