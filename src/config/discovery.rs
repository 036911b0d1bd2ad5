//! Resolve the list of dotfiles to link.
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;
use crate::logging::Log;
use crate::operations::FileSystemOps;

/// Version-control artifacts never linked by discovery.
pub const DEFAULT_EXCLUDED: &[&str] = &[".git", ".gitsubmodules", ".gitmodules", ".gitignore"];

/// Resolve the ordered source list.
///
/// A non-empty `explicit` list is returned as given. Otherwise the entries
/// of `dotfiles_dir` whose names begin with `.` are returned sorted by
/// name, minus [`DEFAULT_EXCLUDED`] and any name in `exclude`.
///
/// # Errors
///
/// Returns [`ConfigurationError::DotfilesDir`] if discovery is needed and
/// `dotfiles_dir` cannot be listed.
pub fn resolve_sources(
    explicit: &[PathBuf],
    dotfiles_dir: &Path,
    exclude: &[String],
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> Result<Vec<PathBuf>, ConfigurationError> {
    if !explicit.is_empty() {
        let names: Vec<String> = explicit.iter().map(|p| p.display().to_string()).collect();
        log.debug(&format!("Using user supplied dotfiles {names:?}"));
        return Ok(explicit.to_vec());
    }

    log.debug(&format!("Searching for dotfiles in {}", dotfiles_dir.display()));
    let children = fs
        .read_dir(dotfiles_dir)
        .map_err(|source| ConfigurationError::DotfilesDir {
            path: dotfiles_dir.to_path_buf(),
            source,
        })?;

    let mut sources: Vec<PathBuf> = children
        .into_iter()
        .filter(|child| {
            let Some(name) = child.file_name() else {
                return false;
            };
            if !name.as_encoded_bytes().starts_with(b".") {
                return false;
            }
            let name = name.to_string_lossy();
            let skipped = DEFAULT_EXCLUDED.contains(&name.as_ref())
                || exclude.iter().any(|e| *e == name);
            if skipped {
                log.debug(&format!("excluded: {name}"));
            }
            !skipped
        })
        .collect();
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    log.debug(&format!("Found {} dotfiles", sources.len()));
    Ok(sources)
}
