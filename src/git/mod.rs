//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! collaborator, allowing the release pipeline to run against a real
//! repository or an in-memory mock.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use release_notifier::git::Repository;
//! # use release_notifier::domain::TagPattern;
//! # fn example<R: Repository>(repo: &R) -> release_notifier::Result<()> {
//! let tags = repo.list_tags(&TagPattern::new(Some("remix")), false)?;
//! let commits = repo.commits_between(&tags[1], &tags[0], None)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::Path;

use tracing::debug;

use crate::domain::version::{classify, VersionKind};
use crate::domain::Tag;
use crate::domain::TagPattern;
use crate::error::Result;

/// Version-control operations the release pipeline depends on
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::NotifyError].
pub trait Repository {
    /// List the version tags of a tracked package
    ///
    /// # Arguments
    /// * `pattern` - Package filter; strips the `<package>@` namespace into `Tag::clean`.
    ///   Nightly tags are not namespaced and always pass it
    /// * `include_nightly` - Keep `v0.0.0-nightly-*` tags
    ///
    /// # Returns
    /// * `Ok(Vec<Tag>)` - Tags sorted by creation time, newest first
    /// * `Err` - On a git error
    fn list_tags(&self, pattern: &TagPattern, include_nightly: bool) -> Result<Vec<Tag>>;

    /// List commit ids reachable from `to` but not from `from`
    ///
    /// # Arguments
    /// * `from` - Older tag (exclusive)
    /// * `to` - Newer tag (inclusive)
    /// * `path` - Only keep commits touching this repository-relative path
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Commit ids, newest first
    /// * `Err` - If either tag is missing, the range is empty, or on a git error
    fn commits_between(&self, from: &Tag, to: &Tag, path: Option<&Path>) -> Result<Vec<String>>;
}

/// Drop non-version tags (and nightlies unless requested), then sort
/// newest first. Ties on creation time fall back to the raw name.
pub(crate) fn select_version_tags(candidates: Vec<Tag>, include_nightly: bool) -> Vec<Tag> {
    let mut tags: Vec<Tag> = candidates
        .into_iter()
        .filter(|tag| match classify(&tag.clean) {
            Ok(VersionKind::Nightly) => include_nightly,
            Ok(_) => true,
            Err(e) => {
                debug!(tag = %tag.raw, error = %e, "ignoring non-version tag");
                false
            }
        })
        .collect();

    tags.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.raw.cmp(&a.raw))
    });
    tags
}

/// Normalize a user-supplied directory filter; `.` or empty means the whole repository
pub(crate) fn normalize_path_filter(path: Option<&Path>) -> Option<String> {
    let raw = path?.to_string_lossy().replace('\\', "/");
    let trimmed = raw.trim_start_matches("./").trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        None
    } else {
        Some(trimmed.to_string())
    }
}
