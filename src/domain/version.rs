//! Version classification for release tags

use crate::error::{NotifyError, Result};
use semver::Version;
use std::fmt;

/// Sentinel prefix of nightly build tags
pub const NIGHTLY_PREFIX: &str = "v0.0.0-nightly-";

/// The release train a version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKind {
    Stable,
    PreRelease,
    Nightly,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionKind::Stable => write!(f, "stable"),
            VersionKind::PreRelease => write!(f, "pre-release"),
            VersionKind::Nightly => write!(f, "nightly"),
        }
    }
}

/// Whether a clean version string carries the nightly sentinel
pub fn is_nightly(clean: &str) -> bool {
    clean.starts_with(NIGHTLY_PREFIX) || clean.starts_with(&NIGHTLY_PREFIX[1..])
}

/// Parse a clean version string, tolerating a leading `v` or `V`
pub fn parse_version(clean: &str) -> Result<Version> {
    let trimmed = clean
        .strip_prefix('v')
        .or_else(|| clean.strip_prefix('V'))
        .unwrap_or(clean);

    Version::parse(trimmed).map_err(|e| {
        NotifyError::version(format!("Invalid version '{}': {}", clean, e))
    })
}

/// Classify a clean version string into exactly one release train.
///
/// Nightly is checked first since nightly versions are also valid
/// pre-release semver strings.
pub fn classify(clean: &str) -> Result<VersionKind> {
    if is_nightly(clean) {
        return Ok(VersionKind::Nightly);
    }

    let version = parse_version(clean)?;
    if version.pre.is_empty() {
        Ok(VersionKind::Stable)
    } else {
        Ok(VersionKind::PreRelease)
    }
}

/// An `x.0.0` version opens a new major line
pub fn is_major_boundary(version: &Version) -> bool {
    version.minor == 0 && version.patch == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stable() {
        assert_eq!(classify("2.0.1").unwrap(), VersionKind::Stable);
        assert_eq!(classify("v1.2.3").unwrap(), VersionKind::Stable);
    }

    #[test]
    fn test_classify_prerelease() {
        assert_eq!(classify("2.1.0-pre.0").unwrap(), VersionKind::PreRelease);
        assert_eq!(classify("v3.0.0-rc.4").unwrap(), VersionKind::PreRelease);
    }

    #[test]
    fn test_classify_nightly() {
        assert_eq!(
            classify("v0.0.0-nightly-5bd1b1c-20231102").unwrap(),
            VersionKind::Nightly
        );
        assert_eq!(
            classify("0.0.0-nightly-5bd1b1c-20231102").unwrap(),
            VersionKind::Nightly
        );
    }

    #[test]
    fn test_classify_invalid() {
        assert!(classify("latest").is_err());
        assert!(classify("1.2").is_err());
        assert!(classify("").is_err());
    }

    #[test]
    fn test_build_metadata_is_still_stable() {
        assert_eq!(classify("1.2.3+build.7").unwrap(), VersionKind::Stable);
    }

    #[test]
    fn test_major_boundary() {
        assert!(is_major_boundary(&parse_version("3.0.0").unwrap()));
        assert!(is_major_boundary(&parse_version("3.0.0-pre.0").unwrap()));
        assert!(!is_major_boundary(&parse_version("3.0.1").unwrap()));
        assert!(!is_major_boundary(&parse_version("3.1.0").unwrap()));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(VersionKind::PreRelease.to_string(), "pre-release");
    }
}
