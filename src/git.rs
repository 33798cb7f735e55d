//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting. Every call blocks
//! until the git process exits.

use crate::constants::STASH_MESSAGE;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Callback invoked with the arguments of every git command before it runs.
pub type GitLogger = fn(&Path, &[&str]);

/// Prints each git command to stderr.
pub fn verbose_logger(repo: &Path, args: &[&str]) {
    eprintln!(
        "    {}",
        format!("$ git {} ({})", args.join(" "), repo.display()).dimmed()
    );
}

pub fn no_op_logger(_repo: &Path, _args: &[&str]) {}

/// Runs git in `repo` and returns its trimmed stdout.
///
/// # Errors
///
/// Fails when git cannot be spawned or exits with a non-zero status; the
/// latter error carries git's stderr.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .context("Failed to spawn git command")?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
    }
}

fn run_logged(repo: &Path, args: &[&str], logger: GitLogger) -> anyhow::Result<String> {
    logger(repo, args);
    run_git(repo, args)
}

fn validate_branch_name(branch: &str) -> anyhow::Result<()> {
    if branch.contains('\0') || branch.contains('\n') || branch.is_empty() {
        anyhow::bail!("Invalid branch name: {:?}", branch);
    }
    Ok(())
}

pub fn has_uncommitted_changes(repo: &Path, logger: GitLogger) -> anyhow::Result<bool> {
    run_logged(repo, &["status", "--porcelain"], logger)
        .map(|output| !output.is_empty())
        .context("Failed to check for uncommitted changes")
}

/// Stashes tracked and untracked changes under [`STASH_MESSAGE`].
pub fn stash(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(
        repo,
        &["stash", "push", "--include-untracked", "-m", STASH_MESSAGE],
        logger,
    )
    .context("Failed to stash changes")?;
    Ok(())
}

pub fn fetch_all(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["fetch", "--all"], logger).context("Failed to fetch from remotes")?;
    Ok(())
}

/// Returns the raw `git branch` listing, one short ref name per line.
pub fn list_branches(repo: &Path, logger: GitLogger) -> anyhow::Result<String> {
    run_logged(
        repo,
        &["branch", "--list", "--format=%(refname:short)"],
        logger,
    )
    .context("Failed to list local branches")
}

pub fn checkout(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["checkout", branch], logger)
        .with_context(|| format!("Failed to checkout branch '{}'", branch))?;
    Ok(())
}

/// Pulls the currently checked out branch.
pub fn pull(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["pull"], logger)
        .with_context(|| format!("Failed to pull branch '{}'", branch))?;
    Ok(())
}
