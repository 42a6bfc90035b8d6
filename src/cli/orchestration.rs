//! Main workflow orchestration logic
//!
//! The release pipeline runs in two phases so the binary can report
//! between them:
//! 1. [resolve_release]: tags -> release delta -> commits -> pull requests
//! 2. [notify_release]: comments, closes and label edits on the forge

use tracing::info;

use crate::analyzer::{dedupe_pull_requests, PullRequestAnalyzer};
use crate::boundary::{resolve_release_delta, ReleaseDelta};
use crate::config::Config;
use crate::domain::{MergedPullRequest, TagPattern};
use crate::error::Result;
use crate::forge::Forge;
use crate::git::Repository;
use crate::notifier::{Notifier, NotifyOptions, NotifySummary};

/// Outcome of the read-only resolution phase
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelease {
    pub delta: ReleaseDelta,
    /// Number of commits scanned in the release range
    pub commit_count: usize,
    /// Pull requests to notify, one record per pull request number
    pub pull_requests: Vec<MergedPullRequest>,
}

/// Result of a complete workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub release: ResolvedRelease,
    pub summary: NotifySummary,
}

/// Resolve the release delta and the pull requests it shipped.
///
/// Fails before any forge access if the configuration is invalid, and
/// before any commit scanning if the boundary cannot be resolved.
pub fn resolve_release<R: Repository, F: Forge>(
    config: &Config,
    repo: &R,
    forge: &F,
) -> Result<ResolvedRelease> {
    config.validate()?;

    let pattern = TagPattern::new(config.package.as_deref());
    let tags = repo.list_tags(&pattern, config.include_nightly)?;
    let delta = resolve_release_delta(&tags)?;
    info!(
        latest = %delta.latest.raw,
        previous = %delta.previous.raw,
        kind = %delta.kind,
        "resolved release delta"
    );

    let commits = repo.commits_between(&delta.previous, &delta.latest, config.directory_path())?;
    info!(count = commits.len(), "scanning commits");

    let records = PullRequestAnalyzer::new(forge).resolve(&commits)?;
    let pull_requests = dedupe_pull_requests(records);
    info!(count = pull_requests.len(), "resolved pull requests");

    Ok(ResolvedRelease {
        delta,
        commit_count: commits.len(),
        pull_requests,
    })
}

/// Notification settings for a resolved release
pub fn notify_options(config: &Config, delta: &ReleaseDelta) -> NotifyOptions {
    NotifyOptions {
        version: delta.version().to_string(),
        stable: delta.is_stable(),
        pr_label_to_remove: config.pr_label_to_remove.clone(),
        issue_label_to_remove: config.issue_label_to_remove.clone(),
        issue_label_to_keep_open: config.issue_label_to_keep_open.clone(),
        templates: config.messages.clone(),
    }
}

/// Notify every resolved pull request and its issues
pub fn notify_release<F: Forge>(
    config: &Config,
    forge: &F,
    release: &ResolvedRelease,
) -> Result<NotifySummary> {
    let options = notify_options(config, &release.delta);
    Notifier::new(forge, options, config.dry_run).notify(&release.pull_requests)
}

/// Run both phases
pub fn run_notify_workflow<R: Repository, F: Forge>(
    config: &Config,
    repo: &R,
    forge: &F,
) -> Result<WorkflowResult> {
    let release = resolve_release(config, repo, forge)?;
    let summary = notify_release(config, forge, &release)?;
    Ok(WorkflowResult { release, summary })
}
