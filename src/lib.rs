//! Bulk updater for a directory tree of git repositories.
//!
//! This crate walks a root directory and, for every repository it finds:
//! - Checks for uncommitted changes, stashing them or skipping the repository
//! - Fetches all remotes once
//! - Selects the branches of interest (an explicit list or all local branches)
//! - Checks out and pulls each selected branch, collecting per-branch failures

pub mod branch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod repo;
pub mod workspace;
