// Per-repository git operations, update procedure, result types

use crate::branch::{self, NoMatchingBranch};
use crate::config::Config;
use crate::constants::DEFAULT_REPO_NAME;
use crate::git::{self, GitLogger};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Operations the update procedure needs from one repository.
///
/// Each call touches only the working tree it is scoped to.
pub trait RepoOps {
    fn path(&self) -> &Path;

    /// Whether the working tree has uncommitted or untracked changes.
    fn is_dirty(&self) -> anyhow::Result<bool>;

    fn stash(&self) -> anyhow::Result<()>;

    /// Fetches all remotes, at most once per successful call.
    fn fetch_remote(&mut self) -> anyhow::Result<()>;

    /// Fetches remotes first, then lists local branch short names.
    fn list_local_branches(&mut self) -> anyhow::Result<Vec<String>>;

    /// Checks out `branch` and pulls it. A failed checkout skips the pull.
    fn update_branch(&self, branch: &str) -> anyhow::Result<()>;
}

/// A discovered working tree, valid for a single update pass.
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    remote_updated: bool,
    logger: GitLogger,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>, logger: GitLogger) -> Self {
        Self {
            path: path.into(),
            remote_updated: false,
            logger,
        }
    }

    #[must_use]
    pub fn remote_updated(&self) -> bool {
        self.remote_updated
    }
}

impl RepoOps for Repository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_dirty(&self) -> anyhow::Result<bool> {
        git::has_uncommitted_changes(&self.path, self.logger)
    }

    fn stash(&self) -> anyhow::Result<()> {
        git::stash(&self.path, self.logger)
    }

    fn fetch_remote(&mut self) -> anyhow::Result<()> {
        if self.remote_updated {
            return Ok(());
        }
        git::fetch_all(&self.path, self.logger)?;
        self.remote_updated = true;
        Ok(())
    }

    fn list_local_branches(&mut self) -> anyhow::Result<Vec<String>> {
        self.fetch_remote()?;
        let output = git::list_branches(&self.path, self.logger)?;
        Ok(branch::parse_branch_list(&output))
    }

    fn update_branch(&self, branch: &str) -> anyhow::Result<()> {
        git::checkout(&self.path, branch, self.logger)?;
        git::pull(&self.path, branch, self.logger)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStep {
    Started,
    CheckingChanges,
    Stashing,
    Fetching,
    ListingBranches,
    UpdatingBranch { branch: String },
    Completed,
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Starting update"),
            Self::CheckingChanges => write!(f, "Checking for uncommitted changes"),
            Self::Stashing => write!(f, "Stashing uncommitted changes"),
            Self::Fetching => write!(f, "Fetching all remotes"),
            Self::ListingBranches => write!(f, "Listing local branches"),
            Self::UpdatingBranch { branch } => write!(f, "Updating branch '{}'", branch),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Why a repository was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("repository is dirty and stashing is not allowed")]
    DirtyWorkingTree,
    #[error("no branch to update")]
    NoMatchingBranch,
}

impl From<NoMatchingBranch> for SkipReason {
    fn from(_: NoMatchingBranch) -> Self {
        Self::NoMatchingBranch
    }
}

#[derive(Debug)]
pub struct UpdateResult {
    pub path: PathBuf,
    pub outcome: UpdateOutcome,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSuccess {
    pub updated: usize,
    pub had_stash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub branch: String,
    pub error: String,
}

/// Some, but not all, selected branches failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialUpdate {
    pub succeeded: usize,
    pub failed: Vec<BranchFailure>,
    pub had_stash: bool,
}

impl PartialUpdate {
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    #[must_use]
    pub fn failed_branches(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.branch.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    pub error: String,
    pub step: UpdateStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success(UpdateSuccess),
    Partial(PartialUpdate),
    Skipped(SkipReason),
    Failed(UpdateFailure),
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether at least one branch was updated.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Partial(_))
    }

    /// A one-line description of the outcome for status reporting.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Partial(partial) => Some(format!(
                "failed to update {}",
                partial.failed_branches().join(", ")
            )),
            Self::Skipped(reason) => Some(reason.to_string()),
            Self::Failed(failure) => Some(failure.error.clone()),
        }
    }
}

/// Receives progress and completion events for one repository update.
pub trait UpdateCallbacks {
    fn on_update_start(&self, _repo_name: &str) {}

    /// Called when the procedure enters a new step.
    fn on_step(&self, step: &UpdateStep);

    /// Called for steps that run a git command, for verbose output.
    fn on_step_execute(&self, _step: &UpdateStep) {}

    fn on_complete(&self, result: &UpdateResult);

    /// Called once with the final outcome, before [`Self::on_complete`].
    fn on_completion_status(&self, _outcome: &UpdateOutcome) {}
}

#[must_use]
pub fn repo_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_REPO_NAME)
}

fn enter_step<C: UpdateCallbacks + ?Sized>(callbacks: &C, step: &UpdateStep) {
    callbacks.on_step(step);
    callbacks.on_step_execute(step);
}

fn failed_at(step: UpdateStep, error: &anyhow::Error) -> UpdateOutcome {
    UpdateOutcome::Failed(UpdateFailure {
        error: format!("{:#}", error),
        step,
    })
}

/// Runs the full update procedure against one repository.
///
/// Never fails: every error is folded into the returned outcome.
pub fn update<R, C>(repo: &mut R, callbacks: &C, config: &Config) -> UpdateResult
where
    R: RepoOps + ?Sized,
    C: UpdateCallbacks + ?Sized,
{
    let started = Instant::now();
    callbacks.on_update_start(repo_name(repo.path()));

    let outcome = do_update(repo, callbacks, config);
    let result = UpdateResult {
        path: repo.path().to_path_buf(),
        outcome,
        duration: started.elapsed(),
    };

    callbacks.on_completion_status(&result.outcome);
    callbacks.on_complete(&result);
    result
}

fn do_update<R, C>(repo: &mut R, callbacks: &C, config: &Config) -> UpdateOutcome
where
    R: RepoOps + ?Sized,
    C: UpdateCallbacks + ?Sized,
{
    callbacks.on_step(&UpdateStep::Started);

    enter_step(callbacks, &UpdateStep::CheckingChanges);
    let is_dirty = match repo.is_dirty() {
        Ok(dirty) => dirty,
        Err(e) => return failed_at(UpdateStep::CheckingChanges, &e),
    };

    if is_dirty {
        if !config.stash_changes {
            return UpdateOutcome::Skipped(SkipReason::DirtyWorkingTree);
        }
        enter_step(callbacks, &UpdateStep::Stashing);
        if let Err(e) = repo.stash() {
            return failed_at(UpdateStep::Stashing, &e);
        }
    }

    enter_step(callbacks, &UpdateStep::Fetching);
    if let Err(e) = repo.fetch_remote() {
        return failed_at(UpdateStep::Fetching, &e);
    }

    enter_step(callbacks, &UpdateStep::ListingBranches);
    let branches = match repo.list_local_branches() {
        Ok(branches) => branches,
        Err(e) => return failed_at(UpdateStep::ListingBranches, &e),
    };
    let selected = match branch::select_branches(&branches, &config.selection) {
        Ok(selected) => selected,
        Err(no_branch) => return UpdateOutcome::Skipped(no_branch.into()),
    };

    let mut failed = Vec::new();
    for branch in &selected {
        enter_step(
            callbacks,
            &UpdateStep::UpdatingBranch {
                branch: branch.clone(),
            },
        );
        if let Err(e) = repo.update_branch(branch) {
            failed.push(BranchFailure {
                branch: branch.clone(),
                error: format!("{:#}", e),
            });
        }
    }

    callbacks.on_step(&UpdateStep::Completed);
    aggregate(selected.len(), failed, is_dirty)
}

fn aggregate(total: usize, failed: Vec<BranchFailure>, had_stash: bool) -> UpdateOutcome {
    if failed.is_empty() {
        return UpdateOutcome::Success(UpdateSuccess {
            updated: total,
            had_stash,
        });
    }

    if failed.len() == total {
        let branches: Vec<&str> = failed.iter().map(|f| f.branch.as_str()).collect();
        let last_error = failed
            .last()
            .map(|f| f.error.as_str())
            .unwrap_or_default();
        return UpdateOutcome::Failed(UpdateFailure {
            error: format!(
                "all branches failed to update ({}): {}",
                branches.join(", "),
                last_error
            ),
            step: UpdateStep::UpdatingBranch {
                branch: branches.last().map(|b| (*b).to_string()).unwrap_or_default(),
            },
        });
    }

    UpdateOutcome::Partial(PartialUpdate {
        succeeded: total - failed.len(),
        failed,
        had_stash,
    })
}

/// Updates each repository in order, one at a time.
///
/// `make_callbacks` builds the event sink for each repository. A failing
/// repository never stops the ones after it.
pub fn update_workspace<C, F>(
    repos: &[PathBuf],
    make_callbacks: F,
    config: &Config,
) -> Vec<UpdateResult>
where
    C: UpdateCallbacks,
    F: Fn(&Path) -> C,
{
    repos
        .iter()
        .map(|path| {
            let callbacks = make_callbacks(path);
            let mut repo = Repository::new(path.as_path(), config.git_logger());
            update(&mut repo, &callbacks, config)
        })
        .collect()
}
