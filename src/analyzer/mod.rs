//! Analysis engine for mapping release commits to pull requests and issues

pub mod pull_request_analyzer;

pub use pull_request_analyzer::{dedupe_pull_requests, PullRequestAnalyzer};
