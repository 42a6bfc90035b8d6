use crate::error::{NotifyError, Result};
use crate::forge::{Forge, PullRequestSummary, TargetKind};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Forge operation kinds, used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    ClosingIssues,
    IssueLabels,
    Comment,
    CloseIssue,
    RemoveLabel,
}

/// A recorded forge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeCall {
    Search(String),
    ClosingIssues(String),
    IssueLabels(u64),
    Comment(TargetKind, u64, String),
    CloseIssue(u64),
    RemoveLabel(TargetKind, u64, String),
}

impl ForgeCall {
    /// Whether this call changes forge state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ForgeCall::Comment(..) | ForgeCall::CloseIssue(_) | ForgeCall::RemoveLabel(..)
        )
    }
}

/// Mock forge for testing without a network or the `gh` binary
#[derive(Default)]
pub struct MockForge {
    pull_requests: HashMap<String, Vec<PullRequestSummary>>,
    closing_issues: HashMap<String, Vec<u64>>,
    labels: HashMap<u64, Vec<String>>,
    failures: HashSet<(Operation, String)>,
    calls: Mutex<Vec<ForgeCall>>,
}

impl MockForge {
    /// Create a new empty mock forge
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the merged pull request a commit resolves to
    pub fn add_pull_request(&mut self, commit: &str, pr: PullRequestSummary) {
        self.pull_requests
            .entry(commit.to_string())
            .or_default()
            .push(pr);
    }

    /// Register graph-linked closing issues for a pull request url
    pub fn set_closing_issues(&mut self, pr_url: &str, issues: &[u64]) {
        self.closing_issues
            .insert(pr_url.to_string(), issues.to_vec());
    }

    /// Register the labels of an issue
    pub fn set_labels(&mut self, issue: u64, labels: &[&str]) {
        self.labels
            .insert(issue, labels.iter().map(|l| l.to_string()).collect());
    }

    /// Make an operation fail for a target (commit id, url or number)
    pub fn fail(&mut self, operation: Operation, target: impl ToString) {
        self.failures.insert((operation, target.to_string()));
    }

    /// All calls made so far, in completion order
    pub fn calls(&self) -> Vec<ForgeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Only the calls that change forge state
    pub fn mutations(&self) -> Vec<ForgeCall> {
        self.calls().into_iter().filter(ForgeCall::is_mutation).collect()
    }

    fn record(&self, call: ForgeCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, operation: Operation, target: impl ToString) -> Result<()> {
        let target = target.to_string();
        if self.failures.contains(&(operation, target.clone())) {
            return Err(NotifyError::forge(format!(
                "mock failure for {:?} on {}",
                operation, target
            )));
        }
        Ok(())
    }
}

impl Forge for MockForge {
    fn search_merged_pull_requests(&self, commit: &str) -> Result<Vec<PullRequestSummary>> {
        self.record(ForgeCall::Search(commit.to_string()));
        self.check(Operation::Search, commit)?;
        Ok(self.pull_requests.get(commit).cloned().unwrap_or_default())
    }

    fn closing_issue_references(&self, pr_url: &str) -> Result<Vec<u64>> {
        self.record(ForgeCall::ClosingIssues(pr_url.to_string()));
        self.check(Operation::ClosingIssues, pr_url)?;
        Ok(self.closing_issues.get(pr_url).cloned().unwrap_or_default())
    }

    fn issue_labels(&self, issue: u64) -> Result<Vec<String>> {
        self.record(ForgeCall::IssueLabels(issue));
        self.check(Operation::IssueLabels, issue)?;
        Ok(self.labels.get(&issue).cloned().unwrap_or_default())
    }

    fn comment(&self, kind: TargetKind, number: u64, body: &str) -> Result<()> {
        self.record(ForgeCall::Comment(kind, number, body.to_string()));
        self.check(Operation::Comment, number)
    }

    fn close_issue(&self, issue: u64) -> Result<()> {
        self.record(ForgeCall::CloseIssue(issue));
        self.check(Operation::CloseIssue, issue)
    }

    fn remove_label(&self, kind: TargetKind, number: u64, label: &str) -> Result<()> {
        self.record(ForgeCall::RemoveLabel(kind, number, label.to_string()));
        self.check(Operation::RemoveLabel, number)
    }
}
