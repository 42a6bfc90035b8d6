//! GitHub CLI backend
//!
//! Every operation is one `gh` subprocess. Read operations treat a non-zero
//! exit status or any stderr output as a failure; mutations only the exit
//! status, since `gh` reports progress on stderr.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::{Command, Output};
use tracing::debug;

use crate::error::{NotifyError, Result};
use crate::forge::{Forge, PullRequestSummary, TargetKind};

const CLOSING_ISSUES_QUERY: &str = r#"
query($url: URI!, $endCursor: String) {
  resource(url: $url) {
    ... on PullRequest {
      closingIssuesReferences(first: 100, after: $endCursor) {
        nodes { number }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}
"#;

/// Forge backed by the `gh` command-line client
pub struct GhCli {
    repository: String,
    program: String,
}

impl GhCli {
    /// Create a client for an `owner/name` repository
    pub fn new(repository: impl Into<String>) -> Self {
        GhCli {
            repository: repository.into(),
            program: "gh".to_string(),
        }
    }

    /// Use a different executable than `gh` from PATH
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(program = %self.program, ?args, "invoking forge command");
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| NotifyError::forge(format!("Failed to execute {}: {}", self.program, e)))
    }

    /// Run a read-only command and return its stdout
    fn read(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.run(args)?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(NotifyError::forge(format!(
                "{} {} failed (exit code {}): {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    /// Run a mutating command
    fn mutate(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::forge(format!(
                "{} {} failed (exit code {}): {}",
                self.program,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Forge for GhCli {
    fn search_merged_pull_requests(&self, commit: &str) -> Result<Vec<PullRequestSummary>> {
        let stdout = self.read(&[
            "pr",
            "list",
            "--repo",
            &self.repository,
            "--search",
            commit,
            "--state",
            "merged",
            "--json",
            "number,title,url,body",
        ])?;
        parse_pull_requests(&stdout)
    }

    fn closing_issue_references(&self, pr_url: &str) -> Result<Vec<u64>> {
        let query = format!("query={}", CLOSING_ISSUES_QUERY);
        let url = format!("url={}", pr_url);
        let stdout = self.read(&["api", "graphql", "--paginate", "-f", &query, "-f", &url])?;
        parse_closing_issues(&stdout)
    }

    fn issue_labels(&self, issue: u64) -> Result<Vec<String>> {
        let number = issue.to_string();
        let stdout = self.read(&[
            "issue",
            "view",
            &number,
            "--repo",
            &self.repository,
            "--json",
            "labels",
        ])?;
        parse_labels(&stdout)
    }

    fn comment(&self, kind: TargetKind, number: u64, body: &str) -> Result<()> {
        let number = number.to_string();
        self.mutate(&[
            kind.subcommand(),
            "comment",
            &number,
            "--repo",
            &self.repository,
            "--body",
            body,
        ])
    }

    fn close_issue(&self, issue: u64) -> Result<()> {
        let number = issue.to_string();
        self.mutate(&["issue", "close", &number, "--repo", &self.repository])
    }

    fn remove_label(&self, kind: TargetKind, number: u64, label: &str) -> Result<()> {
        let number = number.to_string();
        self.mutate(&[
            kind.subcommand(),
            "edit",
            &number,
            "--repo",
            &self.repository,
            "--remove-label",
            label,
        ])
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| NotifyError::shape(format!("{}: {}", what, e)))
}

/// Decode the output of `gh pr list --json number,title,url,body`
pub fn parse_pull_requests(bytes: &[u8]) -> Result<Vec<PullRequestSummary>> {
    decode(bytes, "merged pull request search")
}

#[derive(Deserialize)]
struct GraphqlPage {
    data: GraphqlData,
}

#[derive(Deserialize)]
struct GraphqlData {
    resource: Option<PullRequestResource>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestResource {
    closing_issues_references: ClosingIssues,
}

#[derive(Deserialize)]
struct ClosingIssues {
    nodes: Vec<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    number: u64,
}

/// Decode paginated closing-issue GraphQL output.
///
/// `gh api --paginate` prints one JSON document per page back to back.
pub fn parse_closing_issues(bytes: &[u8]) -> Result<Vec<u64>> {
    let mut issues = Vec::new();

    for page in serde_json::Deserializer::from_slice(bytes).into_iter::<GraphqlPage>() {
        let page =
            page.map_err(|e| NotifyError::shape(format!("closing issue references: {}", e)))?;
        let resource = page.data.resource.ok_or_else(|| {
            NotifyError::shape("closing issue references: resource is not a pull request")
        })?;

        issues.extend(
            resource
                .closing_issues_references
                .nodes
                .into_iter()
                .map(|n| n.number),
        );
    }

    Ok(issues)
}

#[derive(Deserialize)]
struct IssueLabels {
    labels: Vec<Label>,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

/// Decode the output of `gh issue view --json labels`
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<String>> {
    let parsed: IssueLabels = decode(bytes, "issue labels")?;
    Ok(parsed.labels.into_iter().map(|l| l.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pull_requests() {
        let json = br#"[
            {"number": 10, "title": "fix: router", "url": "https://github.com/o/r/pull/10", "body": "Closes #5"},
            {"number": 11, "title": "feat: x", "url": "https://github.com/o/r/pull/11", "body": ""}
        ]"#;
        let prs = parse_pull_requests(json).unwrap();
        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 10);
        assert_eq!(prs[0].body.as_deref(), Some("Closes #5"));
    }

    #[test]
    fn test_parse_pull_requests_empty() {
        assert!(parse_pull_requests(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_pull_requests_wrong_shape() {
        let result = parse_pull_requests(br#"{"number": 10}"#);
        assert!(matches!(result, Err(NotifyError::Shape(_))));

        let result = parse_pull_requests(br#"[{"number": "ten", "title": "t", "url": "u"}]"#);
        assert!(matches!(result, Err(NotifyError::Shape(_))));
    }

    #[test]
    fn test_parse_closing_issues_single_page() {
        let json = br#"{"data":{"resource":{"closingIssuesReferences":{
            "nodes":[{"number":12},{"number":13}],
            "pageInfo":{"hasNextPage":false,"endCursor":null}}}}}"#;
        assert_eq!(parse_closing_issues(json).unwrap(), vec![12, 13]);
    }

    #[test]
    fn test_parse_closing_issues_concatenated_pages() {
        let json = br#"{"data":{"resource":{"closingIssuesReferences":{"nodes":[{"number":1}],"pageInfo":{"hasNextPage":true,"endCursor":"a"}}}}}
{"data":{"resource":{"closingIssuesReferences":{"nodes":[{"number":2}],"pageInfo":{"hasNextPage":false,"endCursor":"b"}}}}}"#;
        assert_eq!(parse_closing_issues(json).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_parse_closing_issues_not_a_pull_request() {
        let result = parse_closing_issues(br#"{"data":{"resource":null}}"#);
        assert!(matches!(result, Err(NotifyError::Shape(_))));
    }

    #[test]
    fn test_parse_closing_issues_malformed() {
        let result = parse_closing_issues(br#"{"errors":[{"message":"bad"}]}"#);
        assert!(matches!(result, Err(NotifyError::Shape(_))));
    }

    #[test]
    fn test_parse_labels() {
        let json = br#"{"labels":[{"id":"x","name":"keep-open","color":"fff"},{"name":"bug"}]}"#;
        assert_eq!(parse_labels(json).unwrap(), vec!["keep-open", "bug"]);
    }

    #[test]
    fn test_missing_program_is_forge_error() {
        let gh = GhCli::new("o/r").with_program("definitely-not-a-real-gh-binary");
        let result = gh.issue_labels(1);
        assert!(matches!(result, Err(NotifyError::Forge(_))));
    }
}
