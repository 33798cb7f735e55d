//! Test infrastructure for git-dirupdate integration tests.
//!
//! Each test binary compiles this module on its own, so helpers that only
//! some binaries use carry `#[allow(dead_code)]`.

use anyhow::Result;
use git_dirupdate::config::{Config, Verbosity};
use git_dirupdate::git::run_git;
use git_dirupdate::repo::{UpdateCallbacks, UpdateResult, UpdateStep};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Quiet configuration so tests never draw spinners.
#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        verbosity: Verbosity::Quiet,
        ..Config::default()
    }
}

/// Initializes a repository at `path` with one commit on `branch`.
pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    std::fs::create_dir_all(path)?;
    run_git(path, &["init", "-b", branch])?;
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    run_git(path, &["config", "pull.rebase", "false"])?;

    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    run_git(path, &["add", "README.md"])?;
    run_git(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

/// Initializes a repository at `path` tracking a fresh bare remote at `remote`.
#[allow(dead_code)]
pub fn init_repo_with_remote(path: &Path, remote: &Path, branch: &str) -> Result<()> {
    std::fs::create_dir_all(remote)?;
    run_git(remote, &["init", "--bare"])?;
    init_repo(path, branch)?;
    run_git(path, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    run_git(path, &["push", "-u", "origin", branch])?;
    Ok(())
}

/// Creates one repository with its own bare remote per `(name, branch)` pair.
///
/// Remotes live in `<workspace>/.remotes/<name>.git`. They are bare, so they
/// have no `.git` directory and discovery ignores them.
#[allow(dead_code)]
pub fn setup_workspace_with_repos(workspace: &TempDir, repos: &[(&str, &str)]) -> Result<()> {
    let remotes = workspace.path().join(".remotes");
    for (name, branch) in repos {
        init_repo_with_remote(
            &workspace.path().join(name),
            &remotes.join(format!("{}.git", name)),
            branch,
        )?;
    }
    Ok(())
}

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
#[allow(dead_code)]
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    remote: Option<TempDir>,
}

#[allow(dead_code)]
impl TestRepo {
    /// Creates a new test repository with an initial commit on the master branch.
    pub fn new() -> Result<Self> {
        Self::on_branch("master")
    }

    fn on_branch(branch: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        init_repo(&path, branch)?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
            remote: None,
        })
    }

    /// Creates a test repository whose `branch` (master by default) tracks a
    /// bare remote.
    pub fn with_remote(branch: Option<&str>) -> Result<Self> {
        let branch = branch.unwrap_or("master");
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare"])?;

        let mut local = Self::on_branch(branch)?;
        run_git(
            &local.path,
            &["remote", "add", "origin", &remote_dir.path().to_string_lossy()],
        )?;
        run_git(&local.path, &["push", "-u", "origin", branch])?;
        local.remote = Some(remote_dir);

        Ok(local)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_path(&self) -> Option<&Path> {
        self.remote.as_ref().map(TempDir::path)
    }

    /// Deletes the remote directory so any later fetch fails.
    pub fn remove_remote(&mut self) {
        self.remote = None;
    }

    pub fn create_branch(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["branch", name])?;
        Ok(())
    }

    /// Creates a branch and pushes it so it tracks the remote.
    pub fn create_tracked_branch(&self, name: &str) -> Result<()> {
        self.create_branch(name)?;
        run_git(&self.path, &["push", "-u", "origin", name])?;
        Ok(())
    }

    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    pub fn make_untracked(&self) -> Result<()> {
        std::fs::write(self.path.join("untracked.txt"), "untracked content\n")?;
        Ok(())
    }

    pub fn has_stash(&self) -> Result<bool> {
        Ok(!self.stash_list()?.is_empty())
    }

    pub fn stash_list(&self) -> Result<String> {
        run_git(&self.path, &["stash", "list"])
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }

    pub fn current_branch(&self) -> Result<String> {
        run_git(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn head_commit(&self, rev: &str) -> Result<String> {
        run_git(&self.path, &["rev-parse", rev])
    }

    /// Pushes a new commit on `branch` to the remote from a separate clone,
    /// leaving this repository behind.
    pub fn push_upstream_commit(&self, branch: &str) -> Result<String> {
        let remote = self
            .remote_path()
            .ok_or_else(|| anyhow::anyhow!("repository has no remote"))?;
        let clone_dir = TempDir::new()?;
        let clone = clone_dir.path().join("clone");
        run_git(
            clone_dir.path(),
            &["clone", "-b", branch, &remote.to_string_lossy(), "clone"],
        )?;
        run_git(&clone, &["config", "user.email", "test@example.com"])?;
        run_git(&clone, &["config", "user.name", "Test User"])?;
        run_git(&clone, &["config", "commit.gpgsign", "false"])?;
        std::fs::write(clone.join("CHANGES.md"), "upstream change\n")?;
        run_git(&clone, &["add", "CHANGES.md"])?;
        run_git(&clone, &["commit", "-m", "Upstream change"])?;
        run_git(&clone, &["push", "origin", branch])?;
        run_git(&clone, &["rev-parse", "HEAD"])
    }
}

/// Callbacks that count steps and completions across repositories.
#[allow(dead_code)]
#[derive(Clone)]
pub struct CountingCallbacks {
    steps: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingCallbacks {
    pub fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let steps = Arc::new(AtomicUsize::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        (
            Self {
                steps: Arc::clone(&steps),
                completions: Arc::clone(&completions),
            },
            steps,
            completions,
        )
    }
}

impl UpdateCallbacks for CountingCallbacks {
    fn on_step(&self, _step: &UpdateStep) {
        self.steps.fetch_add(1, Ordering::SeqCst);
    }

    fn on_complete(&self, _result: &UpdateResult) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}
