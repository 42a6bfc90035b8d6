//! Release notifications for pull requests and their issues
//!
//! - `message` - Comment templates
//! - `plan` - Turning a resolved pull request into forge mutations
//! - `executor` - Running those mutations concurrently, or logging them in dry-run mode

pub mod executor;
pub mod message;
pub mod plan;

pub use executor::{Notifier, NotifySummary};
pub use message::MessageTemplates;
pub use plan::{plan_actions, NotifyAction, NotifyOptions};
