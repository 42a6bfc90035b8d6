//! User interface module - terminal output for the release pipeline.
//!
//! Diagnostics go through `tracing`; this module prints the user-facing
//! progress lines and reports.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_pull_requests, display_release_delta, display_status,
    display_success, display_summary, display_warning, format_pull_requests,
    format_release_delta, format_summary,
};
