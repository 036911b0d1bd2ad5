//! Core logging types: entry records, status, and the [`Log`] trait.

/// Per-dotfile result for summary reporting.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Name of the dotfile (the link's basename).
    pub name: String,
    /// Final status of the entry.
    pub status: EntryStatus,
    /// Optional detail message (e.g., conflict or error description).
    pub message: Option<String>,
}

/// Status of a processed dotfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// A new link was created.
    Linked,
    /// An existing destination was removed and replaced by a link.
    Replaced,
    /// The destination already linked to the source; nothing to do.
    AlreadyLinked,
    /// The destination was occupied and overwrite was not requested.
    Conflict,
    /// Dry run; no changes were applied.
    DryRun,
    /// Removal or link creation failed.
    Failed,
}

/// Levelled diagnostic sink threaded through the deployer.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// may substitute their own to capture messages.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless enabled).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record the outcome of one dotfile for the summary.
    fn record_entry(&self, name: &str, status: EntryStatus, message: Option<&str>);
}
