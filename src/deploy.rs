//! Link every resolved dotfile into the output directory.
//!
//! The [`Deployer`] walks the source list in order and handles each entry
//! on its own: a conflict or a failed link is logged and recorded, then
//! processing moves on. Only configuration problems, which are detected
//! before the first link, stop a run.
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{self, Config, discovery};
use crate::error::{ConfigurationError, ConflictError, DeployError};
use crate::link::{DotfileLink, LinkState};
use crate::logging::{EntryStatus, Log};
use crate::operations::FileSystemOps;

/// What happened to a single dotfile that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created at a vacant destination.
    Linked,
    /// The destination was removed and replaced by a link.
    Replaced,
    /// The destination already pointed at the source.
    AlreadyLinked,
    /// Dry run: a link would be created.
    WouldLink,
    /// Dry run: the destination would be replaced.
    WouldReplace,
}

impl LinkOutcome {
    const fn status(self) -> EntryStatus {
        match self {
            Self::Linked => EntryStatus::Linked,
            Self::Replaced => EntryStatus::Replaced,
            Self::AlreadyLinked => EntryStatus::AlreadyLinked,
            Self::WouldLink | Self::WouldReplace => EntryStatus::DryRun,
        }
    }
}

/// Counters accumulated over one deployment run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeployStats {
    /// Links created at vacant destinations.
    pub linked: u32,
    /// Destinations removed and re-linked.
    pub replaced: u32,
    /// Destinations that already pointed at their source.
    pub already_linked: u32,
    /// Entries skipped because the destination was occupied.
    pub conflicts: u32,
    /// Entries whose removal or link creation failed.
    pub failed: u32,
    /// Entries that would have changed in a dry run.
    pub dry_run: u32,
}

impl DeployStats {
    fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Linked => self.linked += 1,
            LinkOutcome::Replaced => self.replaced += 1,
            LinkOutcome::AlreadyLinked => self.already_linked += 1,
            LinkOutcome::WouldLink | LinkOutcome::WouldReplace => self.dry_run += 1,
        }
    }

    /// Total number of entries processed.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.linked + self.replaced + self.already_linked + self.conflicts + self.failed + self.dry_run
    }

    /// Return `true` if at least one entry failed to link.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for DeployStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} linked, {} replaced, {} already linked, {} conflicts, {} failed",
            self.linked, self.replaced, self.already_linked, self.conflicts, self.failed
        )?;
        if self.dry_run > 0 {
            write!(f, ", {} would change", self.dry_run)?;
        }
        Ok(())
    }
}

/// Links sources into one output directory.
pub struct Deployer<'a> {
    output_dir: PathBuf,
    overwrite: bool,
    dry_run: bool,
    log: &'a dyn Log,
    fs: &'a dyn FileSystemOps,
}

impl fmt::Debug for Deployer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployer")
            .field("output_dir", &self.output_dir)
            .field("overwrite", &self.overwrite)
            .field("dry_run", &self.dry_run)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl<'a> Deployer<'a> {
    /// Create a deployer that links into `output_dir` without overwriting.
    #[must_use]
    pub fn new(output_dir: PathBuf, log: &'a dyn Log, fs: &'a dyn FileSystemOps) -> Self {
        Self {
            output_dir,
            overwrite: false,
            dry_run: false,
            log,
            fs,
        }
    }

    /// Replace occupied destinations instead of skipping them.
    #[must_use]
    pub const fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Report changes without applying them.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The directory links are created in.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Link a single source into the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Conflict`] if the destination is occupied and
    /// overwrite is off, or [`DeployError::LinkCreation`] if the existing
    /// entry cannot be removed or the link cannot be created.
    pub fn link_one(&self, source: &Path) -> Result<LinkOutcome, DeployError> {
        let link = DotfileLink::resolve(source, &self.output_dir, self.fs)?;
        let shown = self
            .fs
            .absolute(&link.destination)
            .unwrap_or_else(|_| link.destination.clone());
        self.log.info(&format!(
            "Creating symlink {} for '{}'",
            shown.display(),
            link.name
        ));

        match link.state(self.fs) {
            LinkState::Linked => {
                self.log
                    .debug(&format!("ok: {} (already linked)", link.description()));
                Ok(LinkOutcome::AlreadyLinked)
            }
            LinkState::Occupied { current } => {
                self.log.info(&format!(
                    "{} already exists ({current})",
                    link.destination.display()
                ));
                if !self.overwrite {
                    return Err(ConflictError {
                        destination: link.destination,
                    }
                    .into());
                }
                if self.dry_run {
                    self.log
                        .dry_run(&format!("would replace {}", link.description()));
                    return Ok(LinkOutcome::WouldReplace);
                }
                self.log
                    .warn(&format!("Overwriting {} ...", link.destination.display()));
                link.remove_existing(self.fs)?;
                link.create(self.fs)?;
                self.log.debug(&format!("linked {}", link.description()));
                Ok(LinkOutcome::Replaced)
            }
            LinkState::Vacant => {
                if self.dry_run {
                    self.log
                        .dry_run(&format!("would link {}", link.description()));
                    return Ok(LinkOutcome::WouldLink);
                }
                link.create(self.fs)?;
                self.log.debug(&format!("linked {}", link.description()));
                Ok(LinkOutcome::Linked)
            }
        }
    }

    /// Link every source in order, isolating per-entry errors.
    ///
    /// Each entry is recorded on the log sink for the summary.
    pub fn run(&self, sources: &[PathBuf]) -> DeployStats {
        self.log.stage("Linking dotfiles");
        let mut stats = DeployStats::default();

        for source in sources {
            let name = entry_name(source);
            match self.link_one(source) {
                Ok(outcome) => {
                    stats.record(outcome);
                    self.log.record_entry(&name, outcome.status(), None);
                }
                Err(DeployError::Conflict(e)) => {
                    let msg = e.to_string();
                    self.log.error(&msg);
                    self.log.record_entry(&name, EntryStatus::Conflict, Some(&msg));
                    stats.conflicts += 1;
                }
                Err(e) => {
                    let msg = match &e {
                        DeployError::LinkCreation(inner) => inner.to_string(),
                        other => other.to_string(),
                    };
                    self.log.error(&format!("Unable to link {name}: {msg}"));
                    self.log.record_entry(&name, EntryStatus::Failed, Some(&msg));
                    stats.failed += 1;
                }
            }
        }

        self.log.debug(&format!("finished: {stats}"));
        stats
    }
}

/// Name used for a source in log lines and the summary.
fn entry_name(source: &Path) -> String {
    source.file_name().map_or_else(
        || source.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Resolve the output directory and sources from `config`, then link them.
///
/// `lookup` reads environment variables (normally [`std::env::var_os`]).
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if no install location can be found or
/// the dotfiles directory cannot be listed. Nothing is linked in that case.
pub fn run(
    config: &Config,
    lookup: impl Fn(&str) -> Option<OsString>,
    log: &dyn Log,
    fs: &dyn FileSystemOps,
) -> Result<DeployStats, ConfigurationError> {
    match &config.output_dir {
        Some(dir) => log.debug(&format!("Using provided output directory {}", dir.display())),
        None => log.debug("Searching for $HOME to use as install location"),
    }
    let output_dir = config::resolve_output_dir(config.output_dir.as_deref(), lookup)?;
    log.info(&format!("Installing dotfiles in {}", output_dir.display()));

    let sources = discovery::resolve_sources(
        &config.dotfiles,
        &config.dotfiles_dir,
        &config.exclude,
        fs,
        log,
    )?;

    Ok(Deployer::new(output_dir, log, fs)
        .overwrite(config.overwrite)
        .dry_run(config.dry_run)
        .run(&sources))
}
