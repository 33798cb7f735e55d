//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

/// Progress bar tick interval in milliseconds.
/// Controls how often the spinner animates.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Branches updated in each repository when no `--branch` is given.
pub const MAIN_BRANCH: &str = "main";
pub const MASTER_BRANCH: &str = "master";

/// Repository count above which the user must confirm before updating.
pub const DEFAULT_WARN_THRESHOLD: usize = 10;

/// Environment variable providing the default root directory.
pub const ROOT_DIR_ENV: &str = "GIT_DIRCLONE_ROOT_DIR";

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Message attached to stashes created before updating a dirty repository.
pub const STASH_MESSAGE: &str = "git-dirupdate: auto-stash";

/// Default name used when a repository name cannot be determined from its path.
pub const DEFAULT_REPO_NAME: &str = "repository";
