//! Spinners, colored output, prompts and summary formatting.
//!
//! This module provides visual feedback while repositories are updated one
//! after another: a spinner per repository, verbose step logging, the
//! confirmation prompt for large runs and the final summary.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::repo::{UpdateCallbacks, UpdateOutcome, UpdateResult, UpdateStep};
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// No-op callbacks for when progress tracking is not needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl UpdateCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &UpdateStep) {}
    fn on_complete(&self, _result: &UpdateResult) {}
}

/// Prints a repository header in verbose mode.
pub fn print_repo_header(config: &Config, repo_name: &str) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("\n{}", format!("[{}]", repo_name).white().bold());
}

/// Prints a step progress message in verbose mode.
pub fn print_step(config: &Config, step: &UpdateStep) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("  {}...", step.to_string().dimmed());
}

/// Prints completion status (verbose mode only).
pub fn print_completion_status(config: &Config, outcome: &UpdateOutcome) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("  {}", completion_status_line(outcome));
}

fn completion_status_line(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Success(_) => format!("{} completed successfully", "✓".green()),
        UpdateOutcome::Partial(partial) => format!(
            "{} updated {}/{}, failed: {}",
            "!".yellow(),
            partial.succeeded,
            partial.total(),
            partial.failed_branches().join(", ")
        ),
        UpdateOutcome::Skipped(reason) => format!("{} skipped: {}", "-".blue(), reason),
        UpdateOutcome::Failed(failure) => format!("{} {}", "✗".red(), failure.error),
    }
}

/// Spinner for the repository currently being updated.
/// Uses `Option` to avoid allocation when progress is hidden (quiet/verbose modes).
pub struct RepoProgress {
    spinner: Option<ProgressBar>,
    label: String,
}

impl RepoProgress {
    pub fn update(&self, step: &UpdateStep) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format_step_message(step, &self.label));
        }
    }

    pub fn finish(&self, result: &UpdateResult) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(format_outcome_line(&self.label, &result.outcome));
        }
    }
}

/// Callbacks for one repository: spinner updates plus verbose output.
pub struct RepoCallbacks {
    progress: RepoProgress,
    config: Config,
}

impl RepoCallbacks {
    pub fn new(progress: RepoProgress, config: Config) -> Self {
        Self { progress, config }
    }
}

impl UpdateCallbacks for RepoCallbacks {
    fn on_update_start(&self, repo_name: &str) {
        print_repo_header(&self.config, repo_name);
    }

    fn on_step(&self, step: &UpdateStep) {
        self.progress.update(step);
    }

    fn on_step_execute(&self, step: &UpdateStep) {
        print_step(&self.config, step);
    }

    fn on_complete(&self, result: &UpdateResult) {
        self.progress.finish(result);
    }

    fn on_completion_status(&self, outcome: &UpdateOutcome) {
        print_completion_status(&self.config, outcome);
    }
}

/// Creates a spinner labelled with the repository path.
/// The spinner is omitted in quiet or verbose mode.
#[must_use]
pub fn create_repo_progress(path: &Path, config: &Config) -> RepoProgress {
    let label = path.display().to_string();
    let spinner = if config.is_quiet() || config.is_verbose() {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(label.clone());
        spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Some(spinner)
    };

    RepoProgress { spinner, label }
}

/// Builds the callbacks used for `path` during a run.
#[must_use]
pub fn repo_callbacks(path: &Path, config: &Config) -> RepoCallbacks {
    RepoCallbacks::new(create_repo_progress(path, config), config.clone())
}

pub fn print_working_dir(path: &Path, config: &Config) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{} {}",
        "Working in:".cyan(),
        path.display().to_string().white().bold()
    );
}

pub fn print_discovery(count: usize, root: &Path, config: &Config) {
    if config.is_quiet() {
        return;
    }
    if count == 0 {
        print_no_repos(root);
    } else {
        println!("{}", format!("Found {} repositories", count).dimmed());
    }
}

/// Asks whether to go ahead with a large run.
///
/// # Errors
///
/// Fails when the prompt cannot be shown, e.g. without a terminal.
pub fn confirm_update(count: usize) -> anyhow::Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to update {} repositories?",
            count
        ))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

pub fn print_summary(results: &[UpdateResult], duration: Duration, config: &Config) {
    if config.is_quiet() {
        print_quiet_summary(results);
    } else {
        print_normal_summary(results, duration);
    }
}

fn print_quiet_summary(results: &[UpdateResult]) {
    let (totals, problems) = quiet_report(results);

    // Always print count to stdout
    println!("{}", totals);

    for line in problems {
        eprintln!("{}", line);
    }
}

/// Totals line plus one line per repository that was not fully updated.
fn quiet_report(results: &[UpdateResult]) -> (String, Vec<String>) {
    let problems = results
        .iter()
        .filter_map(|result| {
            let message = result.outcome.error_message()?;
            let kind = match result.outcome {
                UpdateOutcome::Partial(_) => "warning",
                UpdateOutcome::Skipped(_) => "skipped",
                _ => "error",
            };
            Some(format!("{}: {}: {}", kind, result.path.display(), message))
        })
        .collect();
    (format_totals(results), problems)
}

/// Partially updated repositories count as updated and are called out.
fn format_totals(results: &[UpdateResult]) -> String {
    let updated = results.iter().filter(|r| r.outcome.is_updated()).count();
    let partial = results
        .iter()
        .filter(|r| matches!(r.outcome, UpdateOutcome::Partial(_)))
        .count();

    if partial == 0 {
        format!("{}/{} repositories updated", updated, results.len())
    } else {
        format!(
            "{}/{} repositories updated ({} partially)",
            updated,
            results.len(),
            partial
        )
    }
}

#[derive(Default)]
struct Grouped<'a> {
    succeeded: Vec<&'a UpdateResult>,
    partial: Vec<&'a UpdateResult>,
    skipped: Vec<&'a UpdateResult>,
    failed: Vec<&'a UpdateResult>,
}

fn group(results: &[UpdateResult]) -> Grouped<'_> {
    let mut grouped = Grouped::default();
    for result in results {
        match result.outcome {
            UpdateOutcome::Success(_) => grouped.succeeded.push(result),
            UpdateOutcome::Partial(_) => grouped.partial.push(result),
            UpdateOutcome::Skipped(_) => grouped.skipped.push(result),
            UpdateOutcome::Failed(_) => grouped.failed.push(result),
        }
    }
    grouped
}

fn print_normal_summary(results: &[UpdateResult], duration: Duration) {
    print_section("Summary");
    let grouped = group(results);

    print_group(
        format!("Succeeded ({}):", grouped.succeeded.len()).green().bold(),
        &grouped.succeeded,
    );
    print_group(
        format!("Partial ({}):", grouped.partial.len()).yellow().bold(),
        &grouped.partial,
    );
    print_group(
        format!("Skipped ({}):", grouped.skipped.len()).blue().bold(),
        &grouped.skipped,
    );
    print_group(
        format!("Failed ({}):", grouped.failed.len()).red().bold(),
        &grouped.failed,
    );

    println!(
        "{}: {} in {}",
        "Total".white().bold(),
        format_totals(results),
        format_duration(duration)
    );
}

fn print_group(title: colored::ColoredString, results: &[&UpdateResult]) {
    if results.is_empty() {
        return;
    }
    println!("{}", title);
    for result in results {
        println!(
            "  {} in {}",
            format_outcome_line(&result.path.display().to_string(), &result.outcome),
            format_duration(result.duration).dimmed(),
        );
    }
    println!();
}

fn print_no_repos(root: &Path) {
    println!(
        "{}",
        format!("No git repositories found in {}", root.display())
            .yellow()
            .bold()
    );
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = (50 - title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}

fn format_outcome_line(label: &str, outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Success(success) => {
            let stash_msg = if success.had_stash { " (stashed)" } else { "" };
            format!(
                "{} {}: [{}/{}]{}",
                "✓".green(),
                label,
                success.updated,
                success.updated,
                stash_msg.yellow()
            )
        }
        UpdateOutcome::Partial(partial) => format!(
            "{} {}: [{}/{}] ({})",
            "!".yellow(),
            label,
            partial.succeeded,
            partial.total(),
            partial.failed_branches().join(", ").yellow()
        ),
        UpdateOutcome::Skipped(reason) => {
            format!("{} {}: skipped ({})", "-".blue(), label, reason)
        }
        UpdateOutcome::Failed(failure) => format!(
            "{} {} failed at {}: {}",
            "✗".red(),
            label,
            failure.step,
            failure.error.red()
        ),
    }
}

fn format_step_message(step: &UpdateStep, label: &str) -> String {
    match step {
        UpdateStep::UpdatingBranch { branch } => format!("({}): {}", branch, label),
        UpdateStep::Completed => label.to_string(),
        other => format!("{}: {}...", label, other),
    }
}
