// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can set up an isolated dotfiles checkout and home
// directory without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Lay out an empty workspace inside `root`.
///
/// Creates:
/// - `dotfiles/` the default discovery directory
/// - `home/`     the directory passed as `--output-dir`
/// - `cache/`    used as `XDG_CACHE_HOME` so the log file stays isolated
pub fn setup_workspace(root: &Path) {
    for dir in ["dotfiles", "home", "cache"] {
        std::fs::create_dir_all(root.join(dir)).expect("create workspace dir");
    }
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory acting as the working directory of the binary.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty workspace.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_workspace(root.path());
        Self { root }
    }

    /// Path to the workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the output directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// A [`Command`] for the binary, run from the workspace root with the
    /// environment scrubbed of anything that would leak the real home.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dotfiles-deploy"));
        cmd.current_dir(self.root.path())
            .env_remove("HOME")
            .env_remove("USERPROFILE")
            .env_remove("DOTFILES_DEPLOY_CONFIG")
            .env_remove("DOTFILES_LOG")
            .env("XDG_CACHE_HOME", self.root.path().join("cache"));
        cmd
    }

    /// Run the binary with `--output-dir home` followed by `args`.
    pub fn deploy(&self, args: &[&str]) -> Output {
        self.command()
            .arg("--output-dir")
            .arg(self.home())
            .args(args)
            .output()
            .expect("run dotfiles-deploy")
    }

    /// Target of the symlink at `home/<name>`, or `None` if it is not one.
    pub fn link_target(&self, name: &str) -> Option<PathBuf> {
        std::fs::read_link(self.home().join(name)).ok()
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by an empty workspace.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `relative` under the workspace root, creating
    /// parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Create `dotfiles/<name>` with `content`.
    pub fn with_dotfile(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("dotfiles/{name}"), content)
    }

    /// Create `dotfiles/<name>` as an empty directory.
    pub fn with_dotfile_dir(self, name: &str) -> Self {
        std::fs::create_dir_all(self.ctx.root.path().join("dotfiles").join(name))
            .expect("create dotfile dir");
        self
    }

    /// Create `home/<name>` as a regular file with `content`.
    pub fn with_home_file(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("home/{name}"), content)
    }

    /// Create `home/<name>` as a symlink to `target`, resolved against the
    /// workspace root when relative. The target need not exist.
    pub fn with_home_symlink(self, name: &str, target: &str) -> Self {
        let target = self.ctx.root.path().join(target);
        std::os::unix::fs::symlink(target, self.ctx.home().join(name))
            .expect("create home symlink");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
