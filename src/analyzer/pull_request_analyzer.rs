use rayon::prelude::*;
use tracing::debug;

use crate::domain::{is_release_bookkeeping, scan_closing_issues, MergedPullRequest};
use crate::error::Result;
use crate::forge::Forge;

/// Resolves release commits to the pull requests that merged them
pub struct PullRequestAnalyzer<'a, F: Forge> {
    forge: &'a F,
}

impl<'a, F: Forge> PullRequestAnalyzer<'a, F> {
    /// Create a new analyzer over a forge
    pub fn new(forge: &'a F) -> Self {
        PullRequestAnalyzer { forge }
    }

    /// Resolve every commit concurrently.
    ///
    /// The output keeps the input commit order. Commits without a merged pull
    /// request, or whose pull request is a release version bump, contribute
    /// nothing. Several commits may yield the same pull request; no
    /// cross-commit deduplication happens here.
    ///
    /// # Returns
    /// * `Ok(Vec<MergedPullRequest>)` - One record per resolved commit
    /// * `Err` - The first forge or shape error; aborts the whole resolution
    pub fn resolve(&self, commits: &[String]) -> Result<Vec<MergedPullRequest>> {
        let resolved = commits
            .par_iter()
            .map(|commit| self.resolve_commit(commit))
            .collect::<Result<Vec<_>>>()?;

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Resolve a single commit to its pull request and closed issues
    pub fn resolve_commit(&self, commit: &str) -> Result<Option<MergedPullRequest>> {
        let Some(pr) = self
            .forge
            .search_merged_pull_requests(commit)?
            .into_iter()
            .next()
        else {
            debug!(commit, "no merged pull request");
            return Ok(None);
        };

        if is_release_bookkeeping(&pr.title) {
            debug!(commit, number = pr.number, "skipping release version pull request");
            return Ok(None);
        }

        let mut issues = scan_closing_issues(pr.body.as_deref().unwrap_or_default());
        issues.extend(self.forge.closing_issue_references(&pr.url)?);

        debug!(commit, number = pr.number, ?issues, "resolved pull request");
        Ok(Some(MergedPullRequest {
            number: pr.number,
            issues,
        }))
    }
}

/// Merge records sharing a pull request number, keeping first-seen order
/// and the union of their issues
pub fn dedupe_pull_requests(records: Vec<MergedPullRequest>) -> Vec<MergedPullRequest> {
    let mut merged: Vec<MergedPullRequest> = Vec::with_capacity(records.len());

    for record in records {
        match merged.iter_mut().find(|m| m.number == record.number) {
            Some(existing) => existing.issues.extend(record.issues),
            None => merged.push(record),
        }
    }

    merged
}
