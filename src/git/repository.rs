use crate::domain::{Tag, TagPattern};
use crate::error::{NotifyError, Result};
use crate::git::{normalize_path_filter, select_version_tags};
use git2::{Oid, Reference, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Creation time of a tag: tagger time for annotated tags,
    /// committer time of the target for lightweight ones
    fn tag_created_at(&self, reference: &Reference<'_>) -> Result<i64> {
        if let Some(oid) = reference.target() {
            if let Ok(annotated) = self.repo.find_tag(oid) {
                if let Some(tagger) = annotated.tagger() {
                    return Ok(tagger.when().seconds());
                }
            }
        }

        let commit = reference.peel_to_commit()?;
        Ok(commit.time().seconds())
    }

    fn tag_commit_oid(&self, tag: &Tag) -> Result<Oid> {
        let reference_name = format!("refs/tags/{}", tag.raw);

        let reference = self.repo.find_reference(&reference_name).map_err(|e| {
            NotifyError::vcs(format!("Cannot find tag '{}': {}", tag.raw, e))
        })?;

        Ok(reference.peel_to_commit()?.id())
    }

    /// Whether a commit changes anything under `path` relative to its first parent
    fn touches_path(&self, oid: Oid, path: &str) -> Result<bool> {
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut options = git2::DiffOptions::new();
        options.pathspec(path);

        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut options))?;

        Ok(diff.deltas().len() > 0)
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self, pattern: &TagPattern, include_nightly: bool) -> Result<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;

        let mut candidates = Vec::new();
        for name in names.iter().flatten() {
            let Some(tag) = pattern.parse(name) else {
                continue;
            };

            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            match self.tag_created_at(&reference) {
                Ok(created_at) => candidates.push(tag.created_at(created_at)),
                // tags on blobs or trees never bound a release
                Err(e) => debug!(tag = name, error = %e, "skipping tag without a commit"),
            }
        }

        let tags = select_version_tags(candidates, include_nightly);
        debug!(count = tags.len(), package = ?pattern.package, "listed version tags");
        Ok(tags)
    }

    fn commits_between(&self, from: &Tag, to: &Tag, path: Option<&Path>) -> Result<Vec<String>> {
        let from_oid = self.tag_commit_oid(from)?;
        let to_oid = self.tag_commit_oid(to)?;
        let path_filter = normalize_path_filter(path);

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;

            if let Some(filter) = path_filter.as_deref() {
                if !self.touches_path(oid, filter)? {
                    continue;
                }
            }

            commits.push(oid.to_string());
        }

        if commits.is_empty() {
            return Err(NotifyError::vcs(format!(
                "No commits found between '{}' and '{}'{}",
                from.raw,
                to.raw,
                path_filter
                    .map(|p| format!(" touching '{}'", p))
                    .unwrap_or_default()
            )));
        }

        debug!(count = commits.len(), from = %from.raw, to = %to.raw, "listed commits");
        Ok(commits)
    }
}
