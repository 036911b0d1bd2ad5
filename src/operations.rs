//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the deployer can be
//! unit-tested without touching the real filesystem. Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// What occupies a path, judged without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or anything that is neither a directory nor a link).
    File,
    /// A real directory.
    Dir,
    /// A symbolic link, valid or broken.
    Symlink,
}

/// Abstraction over the filesystem calls made while linking.
pub trait FileSystemOps: std::fmt::Debug {
    /// Return what occupies `path`, or `None` if nothing does.
    ///
    /// Broken symlinks are reported as [`EntryKind::Symlink`].
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove the file, symlink or empty directory at `path`.
    ///
    /// Never recursive: a non-empty directory is left in place and an error
    /// is returned. A symlink is removed itself, not the entry it points to.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created, including when
    /// something already exists at `link`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Make `path` absolute against the current working directory without
    /// resolving symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    fn absolute(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = std::fs::symlink_metadata(path).ok()?;
        Some(if meta.is_symlink() {
            EntryKind::Symlink
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path)
    }
}

/// Check if metadata represents a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, which must still be removed with `remove_dir`, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure files, directories and symlinks with the builder-style
/// methods. Links created through [`FileSystemOps::symlink`] are recorded in
/// order and become visible to later queries.
///
/// # Example
///
/// ```ignore
/// use dotfiles_deploy::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_file("/home/test/.bashrc")
///     .with_dir_entries("dotfiles", vec!["dotfiles/.bashrc".into()]);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    entries: std::sync::Mutex<std::collections::HashMap<PathBuf, EntryKind>>,
    links: std::sync::Mutex<std::collections::HashMap<PathBuf, PathBuf>>,
    dirs: std::collections::HashMap<PathBuf, Vec<PathBuf>>,
    fail_symlink: std::collections::HashSet<PathBuf>,
    fail_remove: std::collections::HashSet<PathBuf>,
    created: std::sync::Mutex<Vec<PathBuf>>,
    removed: std::sync::Mutex<Vec<PathBuf>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as a regular file.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(path.into(), EntryKind::File);
        self
    }

    /// Mark `path` as a real directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(path.into(), EntryKind::Dir);
        self
    }

    /// Set the entries returned by [`FileSystemOps::read_dir`] for `dir`.
    #[must_use]
    pub fn with_dir_entries(mut self, dir: impl Into<PathBuf>, entries: Vec<PathBuf>) -> Self {
        let d = dir.into();
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(d.clone(), EntryKind::Dir);
        self.dirs.insert(d, entries);
        self
    }

    /// Register `path` as a symbolic link pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let p = path.into();
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(p.clone(), EntryKind::Symlink);
        self.links
            .lock()
            .expect("mock links poisoned")
            .insert(p, target.into());
        self
    }

    /// Make [`FileSystemOps::symlink`] fail with `PermissionDenied` at `link`.
    #[must_use]
    pub fn failing_symlink(mut self, link: impl Into<PathBuf>) -> Self {
        self.fail_symlink.insert(link.into());
        self
    }

    /// Make [`FileSystemOps::remove`] fail with `PermissionDenied` at `path`.
    #[must_use]
    pub fn failing_remove(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_remove.insert(path.into());
        self
    }

    /// Links created so far, in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<PathBuf> {
        self.created.lock().expect("mock created poisoned").clone()
    }

    /// Paths removed so far, in removal order.
    #[must_use]
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().expect("mock removed poisoned").clone()
    }

    /// Target of a link created or registered at `path`.
    #[must_use]
    pub fn link_target(&self, path: &Path) -> Option<PathBuf> {
        self.links
            .lock()
            .expect("mock links poisoned")
            .get(path)
            .cloned()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .get(path)
            .copied()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.link_target(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let existed = self
            .entries
            .lock()
            .expect("mock entries poisoned")
            .remove(path)
            .is_some();
        if !existed {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.links.lock().expect("mock links poisoned").remove(path);
        self.removed
            .lock()
            .expect("mock removed poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        if self.fail_symlink.contains(link) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let mut entries = self.entries.lock().expect("mock entries poisoned");
        if entries.contains_key(link) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        entries.insert(link.to_path_buf(), EntryKind::Symlink);
        drop(entries);
        self.links
            .lock()
            .expect("mock links poisoned")
            .insert(link.to_path_buf(), target.to_path_buf());
        self.created
            .lock()
            .expect("mock created poisoned")
            .push(link.to_path_buf());
        Ok(())
    }

    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/work").join(path)
        })
    }
}
