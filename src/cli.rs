//! Command-line flags.

use crate::branch::SelectionMode;
use crate::config::{Config, Verbosity};
use crate::constants::{DEFAULT_WARN_THRESHOLD, ROOT_DIR_ENV};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "git-dirupdate",
    version,
    about = "Fetch and fast-forward every git repository under a directory"
)]
pub struct Cli {
    /// Root directory to search for repositories.
    #[arg(short, long, env = ROOT_DIR_ENV, default_value = "")]
    pub root: String,

    /// Comma-separated branches to update in each repository.
    #[arg(
        short,
        long = "branch",
        value_delimiter = ',',
        default_values_t = [String::from("main"), String::from("master")]
    )]
    pub branches: Vec<String>,

    /// Update every local branch; --branch is ignored.
    #[arg(short, long)]
    pub all_branches: bool,

    /// Stash uncommitted changes instead of skipping dirty repositories.
    #[arg(short, long)]
    pub stash_changes: bool,

    /// Ask for confirmation when more repositories than this are found.
    #[arg(short, long, default_value_t = DEFAULT_WARN_THRESHOLD)]
    pub warn_threshold: usize,

    /// Do not ask for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Only print the final summary.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print every step and git command.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn to_config(&self) -> Config {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        let selection = if self.all_branches {
            SelectionMode::All
        } else {
            SelectionMode::Explicit(self.branches.clone())
        };

        Config {
            verbosity,
            selection,
            stash_changes: self.stash_changes,
            warn_threshold: self.warn_threshold,
            assume_yes: self.yes,
        }
    }
}
