//! Dotfile deployment.
//!
//! Links a set of dotfiles into a target directory (normally `$HOME`) by
//! creating symbolic links, optionally replacing whatever already occupies
//! the destination.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: CLI arguments and the optional TOML file resolved into
//!   one immutable [`config::Config`], plus source discovery
//! - **[`link`]**: a single dotfile link and the state of its destination
//! - **[`deploy`]**: the [`deploy::Deployer`] that links every source in order
//! - **[`logging`]**: the [`logging::Log`] sink threaded through the run
//! - **[`operations`]**: the filesystem seam used by everything above
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod link;
pub mod logging;
pub mod operations;
