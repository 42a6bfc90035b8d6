//! Command-line surface and workflow orchestration

pub mod args;
pub mod orchestration;

pub use args::Args;
pub use orchestration::{
    notify_release, resolve_release, run_notify_workflow, ResolvedRelease, WorkflowResult,
};
