//! Domain logic - pure release rules independent of git and forge operations

pub mod prerelease;
pub mod pull_request;
pub mod tag;
pub mod version;

pub use prerelease::PreRelease;
pub use pull_request::{is_release_bookkeeping, scan_closing_issues, MergedPullRequest};
pub use tag::{Tag, TagPattern};
pub use version::{classify, VersionKind};
