//! Pre-release ordinal handling
//!
//! Pre-release versions in a release train look like `<label>.<N>` (e.g. `pre.3`).
//! The boundary resolver needs the ordinal `N` and, for `N > 0`, the raw tag
//! name of the preceding pre-release.

use crate::boundary::BoundaryError;
use semver::Version;
use std::fmt;

/// A pre-release identifier split into its label and trailing ordinal
///
/// # Examples
/// - "pre.0" -> PreRelease { label: "pre", ordinal: 0 }
/// - "rc.12" -> PreRelease { label: "rc", ordinal: 12 }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub label: String,
    pub ordinal: u64,
    /// The ordinal exactly as written, used for literal tag rewriting
    digits: String,
}

impl PreRelease {
    /// Extract the pre-release of a parsed version.
    ///
    /// `tag` is only used to name the offending tag in errors.
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - The identifier sequence is `<label>.<N>`
    /// * `Err(BoundaryError::MalformedPreRelease)` - Any other shape, including none
    pub fn from_version(version: &Version, tag: &str) -> Result<Self, BoundaryError> {
        Self::parse(version.pre.as_str()).ok_or_else(|| BoundaryError::MalformedPreRelease {
            tag: tag.to_string(),
        })
    }

    /// Parse a `<label>.<N>` identifier sequence
    pub fn parse(s: &str) -> Option<Self> {
        let (label, digits) = s.split_once('.')?;

        if label.is_empty() || label.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        Some(PreRelease {
            label: label.to_string(),
            ordinal: digits.parse().ok()?,
            digits: digits.to_string(),
        })
    }

    /// First pre-release of a chain (`pre.0`)
    pub fn is_first(&self) -> bool {
        self.ordinal == 0
    }

    /// Rewrite a raw tag name ending in this pre-release to name the
    /// preceding ordinal: `remix@2.1.0-pre.3` -> `remix@2.1.0-pre.2`.
    ///
    /// This is a literal string transform of the ordinal, which ends the
    /// name or precedes `+<build>` metadata (kept as is). Returns `None` for
    /// the first pre-release or when the tag does not carry this ordinal.
    pub fn previous_tag_name(&self, raw: &str) -> Option<String> {
        if self.is_first() {
            return None;
        }
        let (head, build) = match raw.rfind('+') {
            Some(i) if raw[..i].ends_with(&self.digits) => raw.split_at(i),
            _ => (raw, ""),
        };
        let stem = head.strip_suffix(&self.digits)?;
        if !stem.ends_with('.') {
            return None;
        }
        Some(format!("{}{}{}", stem, self.ordinal - 1, build))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.digits)
    }
}
