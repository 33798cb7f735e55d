//! Repository discovery under a root directory.

use crate::config::Config;
use crate::constants::GIT_DIR;
use crate::output;
use crate::repo::{self, UpdateCallbacks, UpdateResult};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// How a run over a root directory ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Discovery found nothing to update.
    NoRepositories,
    /// The user declined the confirmation prompt.
    Declined,
    /// Every discovered repository was processed, in discovery order.
    Completed(Vec<UpdateResult>),
}

/// Discovers the repositories below `root` and updates them one by one.
///
/// `confirm` is asked with the repository count only when the count is above
/// the warning threshold and `assume_yes` is off. `make_callbacks` builds the
/// reporter for each repository.
///
/// # Errors
///
/// Fails when discovery fails or the confirmation cannot be obtained.
/// Per-repository failures are part of the returned results instead.
pub fn run<P, F, C>(
    root: &Path,
    config: &Config,
    confirm: P,
    make_callbacks: F,
) -> anyhow::Result<RunOutcome>
where
    P: FnOnce(usize) -> anyhow::Result<bool>,
    F: Fn(&Path) -> C,
    C: UpdateCallbacks,
{
    output::print_working_dir(root, config);

    let repos = find_git_repos(root)?;
    output::print_discovery(repos.len(), root, config);
    if repos.is_empty() {
        return Ok(RunOutcome::NoRepositories);
    }

    if needs_confirmation(repos.len(), config.warn_threshold)
        && !config.assume_yes
        && !confirm(repos.len())?
    {
        return Ok(RunOutcome::Declined);
    }

    let started = Instant::now();
    let results = repo::update_workspace(&repos, make_callbacks, config);
    output::print_summary(&results, started.elapsed(), config);

    Ok(RunOutcome::Completed(results))
}

/// Resolves the user-supplied root into a directory to search.
///
/// An empty root means the current directory. A leading `~` or `~/` is
/// replaced by the home directory; `~` anywhere else is left alone.
///
/// # Errors
///
/// Fails when the root needs the home directory and it cannot be determined.
pub fn expand_root(raw: &str) -> anyhow::Result<PathBuf> {
    expand_tilde(raw, dirs::home_dir)
}

fn expand_tilde<F>(raw: &str, home_dir: F) -> anyhow::Result<PathBuf>
where
    F: FnOnce() -> Option<PathBuf>,
{
    if raw.is_empty() {
        return Ok(PathBuf::from("."));
    }

    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };

    let home = home_dir().context("Failed to determine home directory")?;
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Finds every working tree below `root` that has a `.git` directory.
///
/// Symlinks are followed and siblings are visited in file name order, so the
/// result is in depth-first traversal order. Repositories nested inside
/// another working tree are found too; `.git` directories themselves are
/// never descended into. Unreadable directories below the root are skipped.
///
/// # Errors
///
/// Fails when the root does not exist, is not a directory, or cannot be read.
pub fn find_git_repos(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)
        .with_context(|| format!("Cannot access root directory {}", root.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("Root path {} is not a directory", root.display());
    }
    std::fs::read_dir(root)
        .with_context(|| format!("Cannot read root directory {}", root.display()))?;

    let mut repos = Vec::new();
    let mut walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else {
            continue;
        };
        if entry.file_type().is_dir() && entry.file_name() == GIT_DIR {
            if let Some(working_tree) = working_tree_of(entry.path()) {
                repos.push(working_tree);
            }
            walker.skip_current_dir();
        }
    }

    Ok(repos)
}

// A relative `.git` has an empty parent, which is the current directory.
fn working_tree_of(git_dir: &Path) -> Option<PathBuf> {
    git_dir.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        }
    })
}

/// Whether a run over `count` repositories must be confirmed first.
#[must_use]
pub fn needs_confirmation(count: usize, threshold: usize) -> bool {
    count > threshold
}
