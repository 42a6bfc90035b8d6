//! Code-forge operations abstraction layer
//!
//! The release pipeline reads pull requests, linked issues and labels from
//! the forge and writes comments, closes issues and edits labels. All of it
//! goes through the [Forge] trait:
//!
//! - [gh::GhCli]: invokes the GitHub CLI and validates its JSON output
//! - [mock::MockForge]: records calls in memory for testing
//!
//! Implementations must be `Send + Sync`; the pipeline fans calls out
//! across threads.

pub mod gh;
pub mod mock;

pub use gh::GhCli;
pub use mock::{ForgeCall, MockForge, Operation};

use serde::Deserialize;
use std::fmt;

use crate::error::Result;

/// What a comment or label edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    PullRequest,
    Issue,
}

impl TargetKind {
    /// The `gh` subcommand for this target
    pub fn subcommand(&self) -> &'static str {
        match self {
            TargetKind::PullRequest => "pr",
            TargetKind::Issue => "issue",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::PullRequest => write!(f, "pull request"),
            TargetKind::Issue => write!(f, "issue"),
        }
    }
}

/// A merged pull request as returned by the forge search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequestSummary {
    pub fn new(number: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        PullRequestSummary {
            number,
            title: title.into(),
            url: format!("https://github.com/example/repo/pull/{}", number),
            body: Some(body.into()),
        }
    }
}

/// Forge operations the release pipeline depends on
pub trait Forge: Send + Sync {
    /// Merged pull requests whose history contains `commit`, most relevant first
    fn search_merged_pull_requests(&self, commit: &str) -> Result<Vec<PullRequestSummary>>;

    /// Issue numbers the forge links to a pull request as closed by it
    fn closing_issue_references(&self, pr_url: &str) -> Result<Vec<u64>>;

    /// Current label names of an issue
    fn issue_labels(&self, issue: u64) -> Result<Vec<String>>;

    /// Post a comment on a pull request or issue
    fn comment(&self, kind: TargetKind, number: u64, body: &str) -> Result<()>;

    /// Close an issue
    fn close_issue(&self, issue: u64) -> Result<()>;

    /// Remove a label from a pull request or issue
    fn remove_label(&self, kind: TargetKind, number: u64, label: &str) -> Result<()>;
}
