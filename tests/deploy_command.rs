#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `dotfiles-deploy` binary.
//!
//! Each test runs the compiled binary inside an isolated workspace and checks
//! the filesystem it leaves behind together with its exit status.

mod common;

use common::{IntegrationTestContext, TestContextBuilder};

fn home_entries(ctx: &IntegrationTestContext) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(ctx.home())
        .expect("read home")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Explicit sources
// ---------------------------------------------------------------------------

#[test]
fn explicit_source_is_linked_with_absolute_target() {
    let ctx = TestContextBuilder::new()
        .with_file("cfg/.bashrc", "export EDITOR=vim\n")
        .build();

    let out = ctx.deploy(&["./cfg/.bashrc"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let target = ctx.link_target(".bashrc").expect(".bashrc should be a symlink");
    assert!(target.is_absolute());
    assert!(target.ends_with("cfg/.bashrc"));
    assert_eq!(
        std::fs::read_to_string(ctx.home().join(".bashrc")).unwrap(),
        "export EDITOR=vim\n"
    );
}

#[test]
fn conflict_keeps_existing_file_and_exits_zero() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".vimrc", "set number\n")
        .with_home_file(".vimrc", "mine\n")
        .build();

    let out = ctx.deploy(&["dotfiles/.vimrc"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(ctx.link_target(".vimrc").is_none());
    assert_eq!(
        std::fs::read_to_string(ctx.home().join(".vimrc")).unwrap(),
        "mine\n"
    );
    assert!(String::from_utf8_lossy(&out.stderr).contains("--overwrite"));
}

#[test]
fn overwrite_replaces_existing_file() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".vimrc", "set number\n")
        .with_home_file(".vimrc", "mine\n")
        .build();

    let out = ctx.deploy(&["--overwrite", "dotfiles/.vimrc"]);

    assert!(out.status.success());
    assert!(ctx.link_target(".vimrc").is_some());
    assert_eq!(
        std::fs::read_to_string(ctx.home().join(".vimrc")).unwrap(),
        "set number\n"
    );
}

#[test]
fn overwrite_replaces_symlinks_without_touching_their_targets() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".a", "")
        .with_dotfile(".b", "")
        .with_file("somedir/keep", "kept\n")
        .with_home_symlink(".a", "/nowhere/x")
        .with_home_symlink(".b", "somedir")
        .build();

    let out = ctx.deploy(&["--overwrite", "dotfiles/.a", "dotfiles/.b"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(ctx.link_target(".a").unwrap().ends_with("dotfiles/.a"));
    assert!(ctx.link_target(".b").unwrap().ends_with("dotfiles/.b"));
    assert_eq!(
        std::fs::read_to_string(ctx.root_path().join("somedir/keep")).unwrap(),
        "kept\n"
    );
}

#[test]
fn overwrite_refuses_non_empty_directory() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".c", "")
        .with_dotfile(".d", "")
        .with_home_file(".c/inner", "x")
        .build();

    let out = ctx.deploy(&["--overwrite", "dotfiles/.c", "dotfiles/.d"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(ctx.home().join(".c/inner").exists());
    assert!(ctx.link_target(".c").is_none());
    assert!(ctx.link_target(".d").is_some());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot remove existing"));
}

#[test]
fn rerun_reports_already_linked() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .build();

    assert!(ctx.deploy(&["dotfiles/.bashrc"]).status.success());
    let out = ctx.deploy(&["dotfiles/.bashrc"]);

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("1 already linked"));
}

// ---------------------------------------------------------------------------
// Exit status
// ---------------------------------------------------------------------------

#[test]
fn missing_home_is_fatal_and_links_nothing() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .build();

    let out = ctx
        .command()
        .arg("dotfiles/.bashrc")
        .output()
        .expect("run dotfiles-deploy");

    assert_eq!(out.status.code(), Some(1));
    assert!(home_entries(&ctx).is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no install location"));
}

#[test]
fn link_failure_exits_one_after_processing_everything() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .build();

    let out = ctx
        .command()
        .arg("--output-dir")
        .arg(ctx.root_path().join("does-not-exist"))
        .arg("dotfiles/.bashrc")
        .output()
        .expect("run dotfiles-deploy");

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("1 failed"));
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn discovery_links_dotfiles_and_skips_vcs_artifacts() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .with_dotfile(".gitignore", "")
        .with_dotfile("README.md", "")
        .with_dotfile_dir(".git")
        .with_dotfile_dir(".config")
        .build();

    let out = ctx.deploy(&[]);

    assert!(out.status.success());
    assert_eq!(home_entries(&ctx), vec![".bashrc", ".config"]);
}

#[test]
fn missing_dotfiles_dir_is_fatal() {
    let ctx = IntegrationTestContext::new();

    let out = ctx.deploy(&["--dotfiles-dir", "nowhere"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(home_entries(&ctx).is_empty());
}

// ---------------------------------------------------------------------------
// Dry run and configuration
// ---------------------------------------------------------------------------

#[test]
fn dry_run_changes_nothing() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .with_dotfile(".vimrc", "")
        .with_home_file(".vimrc", "mine\n")
        .build();

    let out = ctx.deploy(&["--dry-run", "--overwrite"]);

    assert!(out.status.success());
    assert_eq!(home_entries(&ctx), vec![".vimrc"]);
    assert!(ctx.link_target(".vimrc").is_none());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("would link"));
    assert!(stdout.contains("would replace"));
}

#[test]
fn config_file_enables_overwrite() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".vimrc", "")
        .with_home_file(".vimrc", "mine\n")
        .with_file("deploy.toml", "overwrite = true\n")
        .build();

    let out = ctx.deploy(&["--config", "deploy.toml"]);

    assert!(out.status.success());
    assert!(ctx.link_target(".vimrc").is_some());
}

#[test]
fn invalid_config_file_is_fatal() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".vimrc", "")
        .with_file("deploy.toml", "overwirte = true\n")
        .build();

    let out = ctx.deploy(&["--config", "deploy.toml"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(home_entries(&ctx).is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("deploy.toml"));
}

#[test]
fn unknown_log_level_falls_back_with_warning() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .build();

    let out = ctx.deploy(&["--log-level", "LOUD"]);

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown log level"));
    assert!(ctx.link_target(".bashrc").is_some());
}

#[test]
fn run_is_written_to_log_file() {
    let ctx = TestContextBuilder::new()
        .with_dotfile(".bashrc", "")
        .build();

    assert!(ctx.deploy(&[]).status.success());

    let log = std::fs::read_to_string(ctx.root_path().join("cache/dotfiles/deploy.log"))
        .expect("log file");
    assert!(log.contains("Installing dotfiles in"));
    assert!(log.contains("[debug] Searching for dotfiles in dotfiles"));
}

#[test]
fn version_flag_prints_name() {
    let ctx = IntegrationTestContext::new();
    let out = ctx
        .command()
        .arg("--version")
        .output()
        .expect("run dotfiles-deploy");

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("dotfiles-deploy "));
}
