//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are testable; `display_*`
//! functions print it.

use console::style;

use crate::boundary::ReleaseDelta;
use crate::domain::MergedPullRequest;
use crate::notifier::NotifySummary;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Describe the resolved release boundary.
pub fn format_release_delta(delta: &ReleaseDelta) -> String {
    format!(
        "Release {} ({}): changes since {}",
        delta.latest.raw, delta.kind, delta.previous.raw
    )
}

/// Display the resolved release boundary.
pub fn display_release_delta(delta: &ReleaseDelta) {
    println!("\n{}", style(format_release_delta(delta)).bold());
}

/// One line per pull request with the issues it closes.
pub fn format_pull_requests(records: &[MergedPullRequest]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            if record.issues.is_empty() {
                format!("#{}", record.number)
            } else {
                let issues: Vec<String> =
                    record.issues.iter().map(|i| format!("#{}", i)).collect();
                format!("#{} closes {}", record.number, issues.join(", "))
            }
        })
        .collect()
}

/// Display resolved pull requests, up to 20 lines.
pub fn display_pull_requests(records: &[MergedPullRequest]) {
    println!(
        "{}",
        style(format!("{} pull request(s) to notify:", records.len())).underlined()
    );

    let lines = format_pull_requests(records);
    for line in lines.iter().take(20) {
        println!("  {}", line);
    }

    if lines.len() > 20 {
        println!("  ... and {} more", lines.len() - 20);
    }
}

/// Final one-line report of a notification run.
pub fn format_summary(summary: &NotifySummary) -> String {
    let verb = if summary.dry_run { "Would notify" } else { "Notified" };
    format!(
        "{} {} pull request(s) and {} issue(s); {} issue(s) closed, {} label(s) removed",
        verb,
        summary.pull_requests,
        summary.issues_commented,
        summary.issues_closed,
        summary.labels_removed
    )
}

/// Display the final report, listing planned actions in dry-run mode.
pub fn display_summary(summary: &NotifySummary) {
    if summary.dry_run {
        display_status("Dry run, no changes were made. Planned actions:");
        for action in &summary.actions {
            println!("  - {}", action);
        }
    }
    display_success(&format_summary(summary));
}
