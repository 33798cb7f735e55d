//! Configuration types for CLI verbosity and update options.

use crate::branch::SelectionMode;
use crate::constants::DEFAULT_WARN_THRESHOLD;
use crate::git::{self, GitLogger};

/// Runtime configuration derived from CLI arguments.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// Branches to update in every repository.
    pub selection: SelectionMode,
    /// Stash dirty working trees instead of skipping them.
    pub stash_changes: bool,
    /// Repository count above which the run needs confirmation.
    pub warn_threshold: usize,
    /// Answer the confirmation prompt with yes.
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            selection: SelectionMode::default(),
            stash_changes: false,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
            assume_yes: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the appropriate git logger based on verbosity settings.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}
