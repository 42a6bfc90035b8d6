//! Release boundary resolution.
//!
//! Given the tracked tags newest-first, pick the tag that bounds "this
//! release" from below. Nightly, pre-release and stable trains each have
//! their own predecessor rule because creation order is the only ordering
//! that holds across all three.

use std::fmt;

use tracing::debug;

use crate::domain::version::{is_major_boundary, parse_version};
use crate::domain::{PreRelease, Tag, VersionKind};
use crate::error::Result;

/// Fatal failures while resolving the release delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// Fewer than two tags are tracked
    TooFewTags { found: usize },
    /// No stable release exists on the required major line
    NoPreviousStable { major: u64 },
    /// The latest pre-release is not of the form `<label>.<N>`
    MalformedPreRelease { tag: String },
    /// The decremented pre-release tag does not exist
    PreviousPreReleaseNotFound { expected: String },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::TooFewTags { found } => {
                write!(f, "Need at least 2 tags to resolve a release, found {}", found)
            }
            BoundaryError::NoPreviousStable { major } => {
                write!(f, "No previous stable release found for major version {}", major)
            }
            BoundaryError::MalformedPreRelease { tag } => {
                write!(
                    f,
                    "Cannot read pre-release ordinal of '{}': expected '<label>.<N>'",
                    tag
                )
            }
            BoundaryError::PreviousPreReleaseNotFound { expected } => {
                write!(f, "Prior pre-release tag '{}' not found", expected)
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

/// The `(previous, latest)` pair bounding a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDelta {
    pub previous: Tag,
    pub latest: Tag,
    pub kind: VersionKind,
}

impl ReleaseDelta {
    /// Whether the latest tag is a stable release
    pub fn is_stable(&self) -> bool {
        self.kind == VersionKind::Stable
    }

    /// The published version as shown to users
    pub fn version(&self) -> &str {
        self.latest.version_part()
    }
}

/// Resolve the release delta from tags sorted newest first.
///
/// # Arguments
/// * `tags` - Tracked tags in descending creation order
///
/// # Returns
/// * `Ok(ReleaseDelta)` - `latest` is `tags[0]`
/// * `Err` - Boundary or version error; always fatal
pub fn resolve_release_delta(tags: &[Tag]) -> Result<ReleaseDelta> {
    if tags.len() < 2 {
        return Err(BoundaryError::TooFewTags { found: tags.len() }.into());
    }

    let latest = &tags[0];
    let kind = latest.kind()?;

    let previous = match kind {
        VersionKind::Nightly => tags[1].clone(),
        VersionKind::Stable => previous_stable(latest, tags)?,
        VersionKind::PreRelease => {
            let version = parse_version(&latest.clean)?;
            let pre = PreRelease::from_version(&version, &latest.raw)?;

            if pre.is_first() {
                previous_stable(latest, tags)?
            } else {
                previous_prerelease(latest, &pre, tags)?
            }
        }
    };

    debug!(
        latest = %latest.raw,
        previous = %previous.raw,
        %kind,
        "resolved release delta"
    );

    Ok(ReleaseDelta {
        previous,
        latest: latest.clone(),
        kind,
    })
}

/// Nearest prior stable tag on the same major line, or on the previous
/// major line when `latest` is an `x.0.0` release.
fn previous_stable(latest: &Tag, tags: &[Tag]) -> Result<Tag> {
    let version = parse_version(&latest.clean)?;
    let major = if is_major_boundary(&version) {
        version.major.checked_sub(1).ok_or(BoundaryError::NoPreviousStable { major: 0 })?
    } else {
        version.major
    };

    tags.iter()
        .skip(1)
        .filter(|tag| tag.raw != latest.raw)
        .find(|tag| match tag.kind() {
            Ok(VersionKind::Stable) => parse_version(&tag.clean)
                .map(|v| v.major == major)
                .unwrap_or(false),
            Ok(_) => false,
            Err(e) => {
                debug!(tag = %tag.raw, error = %e, "skipping unparsable tag");
                false
            }
        })
        .cloned()
        .ok_or_else(|| BoundaryError::NoPreviousStable { major }.into())
}

/// The tag with the same raw name and the pre-release ordinal decremented
fn previous_prerelease(latest: &Tag, pre: &PreRelease, tags: &[Tag]) -> Result<Tag> {
    let expected = pre
        .previous_tag_name(&latest.raw)
        .ok_or_else(|| BoundaryError::MalformedPreRelease {
            tag: latest.raw.clone(),
        })?;

    tags.iter()
        .find(|tag| tag.raw == expected)
        .cloned()
        .ok_or_else(|| BoundaryError::PreviousPreReleaseNotFound { expected }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagPattern;
    use crate::error::NotifyError;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names.iter().map(|n| Tag::new(*n)).collect()
    }

    fn package_tags(package: &str, names: &[&str]) -> Vec<Tag> {
        let pattern = TagPattern::new(Some(package));
        names.iter().filter_map(|n| pattern.parse(n)).collect()
    }

    fn boundary_err(result: Result<ReleaseDelta>) -> BoundaryError {
        match result {
            Err(NotifyError::Boundary(e)) => e,
            other => panic!("expected boundary error, got {:?}", other),
        }
    }

    #[test]
    fn test_stable_patch_uses_same_major() {
        let list = package_tags("remix", &["remix@2.0.1", "remix@2.0.0", "remix@1.9.0"]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.latest.raw, "remix@2.0.1");
        assert_eq!(delta.previous.raw, "remix@2.0.0");
        assert!(delta.is_stable());
        assert_eq!(delta.version(), "2.0.1");
    }

    #[test]
    fn test_stable_major_boundary_uses_previous_major() {
        let list = package_tags("pkg", &["pkg@3.0.0", "pkg@2.9.5", "pkg@2.0.0"]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "pkg@2.9.5");
    }

    #[test]
    fn test_stable_skips_prereleases_and_nightlies() {
        let list = tags(&[
            "v1.4.0",
            "v1.4.0-pre.1",
            "v0.0.0-nightly-abc-20240101",
            "v1.4.0-pre.0",
            "v1.3.2",
        ]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "v1.3.2");
    }

    #[test]
    fn test_stable_skips_unparsable_candidates() {
        let list = tags(&["v1.2.0", "not-a-version", "v1.1.0"]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "v1.1.0");
    }

    #[test]
    fn test_stable_without_candidate_fails() {
        let list = tags(&["v2.1.0", "v1.9.0"]);
        assert_eq!(
            boundary_err(resolve_release_delta(&list)),
            BoundaryError::NoPreviousStable { major: 2 }
        );
    }

    #[test]
    fn test_first_major_has_no_previous() {
        let list = tags(&["v0.0.0-nightly-x", "v0.0.0"]);
        // nightly resolves to its neighbour regardless
        assert_eq!(resolve_release_delta(&list).unwrap().previous.raw, "v0.0.0");

        let list = tags(&["v0.0.0", "v0.0.0-nightly-x"]);
        assert_eq!(
            boundary_err(resolve_release_delta(&list)),
            BoundaryError::NoPreviousStable { major: 0 }
        );
    }

    #[test]
    fn test_nightly_uses_immediate_predecessor() {
        let list = tags(&[
            "v0.0.0-nightly-bbb-20240102",
            "v0.0.0-nightly-aaa-20240101",
            "v1.0.0",
        ]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "v0.0.0-nightly-aaa-20240101");
        assert_eq!(delta.kind, VersionKind::Nightly);
        assert!(!delta.is_stable());
    }

    #[test]
    fn test_first_prerelease_behaves_like_stable() {
        let list = package_tags(
            "remix",
            &["remix@2.1.0-pre.0", "remix@2.0.1", "remix@2.0.0", "remix@1.19.3"],
        );
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "remix@2.0.1");
        assert_eq!(delta.kind, VersionKind::PreRelease);
    }

    #[test]
    fn test_first_prerelease_of_new_major() {
        let list = tags(&["v3.0.0-pre.0", "v2.4.1", "v3.0.0-alpha.1"]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "v2.4.1");
    }

    #[test]
    fn test_later_prerelease_uses_decremented_ordinal() {
        let list = tags(&["v2.1.0-pre.3", "v2.0.5", "v2.1.0-pre.2", "v2.1.0-pre.1"]);
        let delta = resolve_release_delta(&list).unwrap();
        assert_eq!(delta.previous.raw, "v2.1.0-pre.2");
    }

    #[test]
    fn test_later_prerelease_missing_predecessor_fails() {
        let list = tags(&["v2.1.0-pre.3", "v2.1.0-pre.1", "v2.0.0"]);
        assert_eq!(
            boundary_err(resolve_release_delta(&list)),
            BoundaryError::PreviousPreReleaseNotFound {
                expected: "v2.1.0-pre.2".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_prerelease_fails() {
        let list = tags(&["v2.1.0-beta", "v2.0.0"]);
        assert_eq!(
            boundary_err(resolve_release_delta(&list)),
            BoundaryError::MalformedPreRelease {
                tag: "v2.1.0-beta".to_string()
            }
        );
    }

    #[test]
    fn test_too_few_tags() {
        assert_eq!(
            boundary_err(resolve_release_delta(&tags(&["v1.0.0"]))),
            BoundaryError::TooFewTags { found: 1 }
        );
        assert_eq!(
            boundary_err(resolve_release_delta(&[])),
            BoundaryError::TooFewTags { found: 0 }
        );
    }

    #[test]
    fn test_unparsable_latest_is_version_error() {
        let result = resolve_release_delta(&tags(&["latest", "v1.0.0"]));
        assert!(matches!(result, Err(NotifyError::Version(_))));
    }

    #[test]
    fn test_boundary_error_display() {
        let err = BoundaryError::PreviousPreReleaseNotFound {
            expected: "v1.0.0-pre.1".to_string(),
        };
        assert_eq!(err.to_string(), "Prior pre-release tag 'v1.0.0-pre.1' not found");
    }
}
