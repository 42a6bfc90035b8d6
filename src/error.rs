use thiserror::Error;

use crate::boundary::BoundaryError;

/// Unified error type for release-notifier operations
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Boundary resolution failed: {0}")]
    Boundary(#[from] BoundaryError),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("VCS error: {0}")]
    Vcs(String),

    #[error("Forge command failed: {0}")]
    Forge(String),

    #[error("Unexpected forge response shape: {0}")]
    Shape(String),

    #[error("{} notification(s) failed:\n  {}", .0.len(), .0.join("\n  "))]
    Notification(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-notifier
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        NotifyError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        NotifyError::Version(msg.into())
    }

    /// Create a VCS error that did not originate in git2
    pub fn vcs(msg: impl Into<String>) -> Self {
        NotifyError::Vcs(msg.into())
    }

    /// Create a forge invocation error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        NotifyError::Forge(msg.into())
    }

    /// Create a shape-validation error with context
    pub fn shape(msg: impl Into<String>) -> Self {
        NotifyError::Shape(msg.into())
    }
}
