//! Branch selection policy.
//!
//! Turns the raw local branch listing of a repository into the ordered list
//! of branches to update, according to the run-wide [`SelectionMode`].

use crate::constants::{MAIN_BRANCH, MASTER_BRANCH};
use thiserror::Error;

/// Which branches of each repository get updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Only branches whose name appears in the list.
    Explicit(Vec<String>),
    /// Every local branch.
    All,
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Explicit(vec![MAIN_BRANCH.to_string(), MASTER_BRANCH.to_string()])
    }
}

/// The selection came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no branch to update")]
pub struct NoMatchingBranch;

fn is_local_branch(line: &str) -> bool {
    !(line.is_empty()
        || line.starts_with("refs/")
        || line.starts_with("heads/")
        || line.starts_with("origin/")
        || line.contains(char::is_whitespace))
}

/// Extracts local branch names from `git branch` output, dropping noise lines.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| is_local_branch(line))
        .map(str::to_string)
        .collect()
}

/// Picks the branches to update, keeping the repository's listing order.
///
/// In explicit mode, requested names that the repository lacks are ignored.
///
/// # Errors
///
/// Returns [`NoMatchingBranch`] when nothing is selected.
pub fn select_branches(
    branches: &[String],
    mode: &SelectionMode,
) -> Result<Vec<String>, NoMatchingBranch> {
    let selected: Vec<String> = match mode {
        SelectionMode::All => branches.to_vec(),
        SelectionMode::Explicit(requested) => branches
            .iter()
            .filter(|branch| requested.contains(*branch))
            .cloned()
            .collect(),
    };

    if selected.is_empty() {
        return Err(NoMatchingBranch);
    }
    Ok(selected)
}
