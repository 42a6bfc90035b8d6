use crate::domain::{Tag, TagPattern};
use crate::error::{NotifyError, Result};
use crate::git::{normalize_path_filter, select_version_tags, Repository};
use std::collections::HashMap;
use std::path::Path;

/// A commit recorded in the mock, with the paths it touched
#[derive(Debug, Clone)]
struct MockCommit {
    id: String,
    paths: Vec<String>,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: Vec<(String, i64)>,
    ranges: HashMap<(String, String), Vec<MockCommit>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            ranges: HashMap::new(),
        }
    }

    /// Add a tag with its creation timestamp
    pub fn add_tag(&mut self, name: impl Into<String>, created_at: i64) {
        self.tags.push((name.into(), created_at));
    }

    /// Record a commit in the range `from..to`, newest commits added last
    /// are reported first
    pub fn add_commit(&mut self, from: &str, to: &str, id: impl Into<String>, paths: &[&str]) {
        self.ranges
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .push(MockCommit {
                id: id.into(),
                paths: paths.iter().map(|p| p.to_string()).collect(),
            });
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self, pattern: &TagPattern, include_nightly: bool) -> Result<Vec<Tag>> {
        let candidates = self
            .tags
            .iter()
            .filter_map(|(name, created_at)| pattern.parse(name).map(|t| t.created_at(*created_at)))
            .collect();

        Ok(select_version_tags(candidates, include_nightly))
    }

    fn commits_between(&self, from: &Tag, to: &Tag, path: Option<&Path>) -> Result<Vec<String>> {
        let filter = normalize_path_filter(path);
        let commits: Vec<String> = self
            .ranges
            .get(&(from.raw.clone(), to.raw.clone()))
            .map(|range| {
                range
                    .iter()
                    .rev()
                    .filter(|c| match filter.as_deref() {
                        Some(dir) => c
                            .paths
                            .iter()
                            .any(|p| p == dir || p.starts_with(&format!("{}/", dir))),
                        None => true,
                    })
                    .map(|c| c.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        if commits.is_empty() {
            return Err(NotifyError::vcs(format!(
                "No commits found between '{}' and '{}'",
                from.raw, to.raw
            )));
        }
        Ok(commits)
    }
}
