use crate::domain::version::{classify, is_nightly, VersionKind};
use crate::error::Result;

/// A version-control tag tracked for release boundaries.
///
/// `raw` is the exact tag name (`remix@2.0.1`, `v0.0.0-nightly-abc123`),
/// `clean` has the package namespace stripped and is what gets classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub raw: String,
    pub clean: String,
    /// Creation time in Unix seconds, as used by the adapter for ordering
    pub created_at: i64,
}

impl Tag {
    /// Create a tag whose clean form equals the raw name
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Tag {
            clean: raw.clone(),
            raw,
            created_at: 0,
        }
    }

    /// Create a tag with an explicit clean form
    pub fn with_clean(raw: impl Into<String>, clean: impl Into<String>) -> Self {
        Tag {
            raw: raw.into(),
            clean: clean.into(),
            created_at: 0,
        }
    }

    /// Attach the creation timestamp
    pub fn created_at(mut self, seconds: i64) -> Self {
        self.created_at = seconds;
        self
    }

    /// Classify the clean version string
    pub fn kind(&self) -> Result<VersionKind> {
        classify(&self.clean)
    }

    /// Clean version without a leading `v`, e.g. for notification text
    pub fn version_part(&self) -> &str {
        self.clean
            .strip_prefix('v')
            .or_else(|| self.clean.strip_prefix('V'))
            .unwrap_or(&self.clean)
    }
}

/// Selects the tags belonging to one package (`<package>@<version>`),
/// or every tag when no package is tracked.
///
/// Nightly tags (`v0.0.0-nightly-*`) are never namespaced and always match;
/// whether they are kept is decided by the `include_nightly` listing flag.
#[derive(Debug, Clone, Default)]
pub struct TagPattern {
    pub package: Option<String>,
}

impl TagPattern {
    /// Create a pattern for an optional package name
    pub fn new(package: Option<&str>) -> Self {
        TagPattern {
            package: package
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }

    fn prefix(&self) -> Option<String> {
        self.package.as_ref().map(|p| format!("{}@", p))
    }

    /// Whether a raw tag name belongs to the tracked package or is a nightly
    pub fn matches(&self, raw: &str) -> bool {
        match self.prefix() {
            Some(prefix) => raw.starts_with(&prefix) || is_nightly(raw),
            None => true,
        }
    }

    /// Build a [Tag] from a raw name, or `None` if it belongs to another package.
    ///
    /// The package namespace is stripped into `clean`; nightlies keep their raw name.
    pub fn parse(&self, raw: &str) -> Option<Tag> {
        if !self.matches(raw) {
            return None;
        }

        let clean = self
            .prefix()
            .and_then(|prefix| raw.strip_prefix(&prefix).map(str::to_string))
            .unwrap_or_else(|| raw.to_string());
        Some(Tag::with_clean(raw, clean))
    }
}
