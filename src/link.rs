//! A single dotfile link: where it goes, what it points at, and what is
//! currently in its way.
use std::path::{Path, PathBuf};

use crate::error::LinkCreationError;
use crate::operations::{EntryKind, FileSystemOps};

/// A symlink to create at `destination` pointing to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfileLink {
    /// The dotfile's name, used as the link's basename.
    pub name: String,
    /// The source path exactly as it was given.
    pub source: PathBuf,
    /// The absolute source path the link points to.
    pub target: PathBuf,
    /// Where the link is created: output directory joined with `name`.
    pub destination: PathBuf,
}

/// What currently occupies a link's destination.
///
/// # Examples
///
/// ```
/// use dotfiles_deploy::link::LinkState;
///
/// let vacant = LinkState::Vacant;
/// let taken = LinkState::Occupied { current: "regular file".into() };
///
/// assert_ne!(vacant, taken);
/// assert_eq!(vacant, LinkState::Vacant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the destination.
    Vacant,
    /// The destination is already a symlink to the target.
    Linked,
    /// Something else exists at the destination.
    Occupied {
        /// Description of what is there.
        current: String,
    },
}

impl DotfileLink {
    /// Compute the link for `source` inside `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkCreationError::InvalidSource`] if `source` has no final
    /// component, or [`LinkCreationError::Absolute`] if it cannot be made
    /// absolute.
    pub fn resolve(
        source: &Path,
        output_dir: &Path,
        fs: &dyn FileSystemOps,
    ) -> Result<Self, LinkCreationError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| LinkCreationError::InvalidSource {
                path: source.to_path_buf(),
            })?;
        let target = fs
            .absolute(source)
            .map_err(|source_err| LinkCreationError::Absolute {
                path: source.to_path_buf(),
                source: source_err,
            })?;

        Ok(Self {
            name: file_name.to_string_lossy().into_owned(),
            source: source.to_path_buf(),
            target,
            destination: output_dir.join(file_name),
        })
    }

    /// Human-readable description of this link.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.destination.display(), self.target.display())
    }

    /// Inspect the destination without following symlinks.
    #[must_use]
    pub fn state(&self, fs: &dyn FileSystemOps) -> LinkState {
        match fs.entry_kind(&self.destination) {
            None => LinkState::Vacant,
            Some(EntryKind::Symlink) => match fs.read_link(&self.destination) {
                Ok(existing) if paths_equal(&existing, &self.target) => LinkState::Linked,
                Ok(existing) => LinkState::Occupied {
                    current: format!("symlink to {}", existing.display()),
                },
                Err(_) => LinkState::Occupied {
                    current: "unreadable symlink".to_string(),
                },
            },
            Some(EntryKind::Dir) => LinkState::Occupied {
                current: "directory".to_string(),
            },
            Some(EntryKind::File) => LinkState::Occupied {
                current: "regular file".to_string(),
            },
        }
    }

    /// Remove whatever occupies the destination.
    ///
    /// # Errors
    ///
    /// Returns [`LinkCreationError::RemoveExisting`] if removal fails, e.g. the
    /// destination is a non-empty directory.
    pub fn remove_existing(&self, fs: &dyn FileSystemOps) -> Result<(), LinkCreationError> {
        fs.remove(&self.destination)
            .map_err(|source| LinkCreationError::RemoveExisting {
                destination: self.destination.clone(),
                source,
            })
    }

    /// Create the symlink.
    ///
    /// # Errors
    ///
    /// Returns [`LinkCreationError::Symlink`] if the link cannot be created,
    /// e.g. the output directory is missing, permission is denied, or
    /// something appeared at the destination in the meantime.
    pub fn create(&self, fs: &dyn FileSystemOps) -> Result<(), LinkCreationError> {
        fs.symlink(&self.target, &self.destination)
            .map_err(|source| LinkCreationError::Symlink {
                destination: self.destination.clone(),
                target: self.target.clone(),
                source,
            })
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}
