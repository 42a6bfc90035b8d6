use rayon::prelude::*;
use std::fmt;
use tracing::warn;

use crate::domain::MergedPullRequest;
use crate::error::Result;
use crate::forge::{Forge, TargetKind};
use crate::notifier::message::MessageTemplates;

/// Release facts and label settings that shape notifications
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    /// Published version named in comments
    pub version: String,
    /// Labels are only removed for stable releases
    pub stable: bool,
    pub pr_label_to_remove: Option<String>,
    pub issue_label_to_remove: Option<String>,
    /// Issues carrying this label are commented on but left open
    pub issue_label_to_keep_open: Option<String>,
    pub templates: MessageTemplates,
}

/// One forge mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyAction {
    Comment {
        kind: TargetKind,
        number: u64,
        body: String,
    },
    CloseIssue(u64),
    RemoveLabel {
        kind: TargetKind,
        number: u64,
        label: String,
    },
}

impl NotifyAction {
    /// Perform this action against the forge
    pub fn execute<F: Forge>(&self, forge: &F) -> Result<()> {
        match self {
            NotifyAction::Comment { kind, number, body } => forge.comment(*kind, *number, body),
            NotifyAction::CloseIssue(number) => forge.close_issue(*number),
            NotifyAction::RemoveLabel {
                kind,
                number,
                label,
            } => forge.remove_label(*kind, *number, label),
        }
    }
}

impl fmt::Display for NotifyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyAction::Comment { kind, number, .. } => {
                write!(f, "comment on {} #{}", kind, number)
            }
            NotifyAction::CloseIssue(number) => write!(f, "close issue #{}", number),
            NotifyAction::RemoveLabel {
                kind,
                number,
                label,
            } => write!(f, "remove label '{}' from {} #{}", label, kind, number),
        }
    }
}

/// Whether an issue may be closed, given the keep-open label.
///
/// A failed label read is not fatal: the issue is treated as closable.
fn should_close<F: Forge>(forge: &F, issue: u64, keep_open: Option<&str>) -> bool {
    let Some(keep_open) = keep_open else {
        return true;
    };

    match forge.issue_labels(issue) {
        Ok(labels) => !labels.iter().any(|l| l == keep_open),
        Err(e) => {
            warn!(issue, error = %e, "could not read issue labels, closing anyway");
            true
        }
    }
}

/// Plan every forge mutation for one pull request and its issues.
///
/// Only read operations are performed here (concurrent label lookups).
pub fn plan_actions<F: Forge>(
    forge: &F,
    record: &MergedPullRequest,
    options: &NotifyOptions,
) -> Vec<NotifyAction> {
    let mut actions = vec![NotifyAction::Comment {
        kind: TargetKind::PullRequest,
        number: record.number,
        body: options
            .templates
            .render(TargetKind::PullRequest, &options.version),
    }];

    if options.stable {
        if let Some(label) = &options.pr_label_to_remove {
            actions.push(NotifyAction::RemoveLabel {
                kind: TargetKind::PullRequest,
                number: record.number,
                label: label.clone(),
            });
        }
    }

    let issues: Vec<u64> = record.issues.iter().copied().collect();
    let keep_open = options.issue_label_to_keep_open.as_deref();
    let closable: Vec<bool> = issues
        .par_iter()
        .map(|issue| should_close(forge, *issue, keep_open))
        .collect();

    let issue_body = options.templates.render(TargetKind::Issue, &options.version);
    for (issue, close) in issues.into_iter().zip(closable) {
        actions.push(NotifyAction::Comment {
            kind: TargetKind::Issue,
            number: issue,
            body: issue_body.clone(),
        });

        if close {
            actions.push(NotifyAction::CloseIssue(issue));
        }

        if options.stable {
            if let Some(label) = &options.issue_label_to_remove {
                actions.push(NotifyAction::RemoveLabel {
                    kind: TargetKind::Issue,
                    number: issue,
                    label: label.clone(),
                });
            }
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::{ForgeCall, MockForge, Operation};

    fn options(stable: bool) -> NotifyOptions {
        NotifyOptions {
            version: "2.0.1".to_string(),
            stable,
            pr_label_to_remove: Some("awaiting release".to_string()),
            issue_label_to_remove: Some("awaiting release".to_string()),
            issue_label_to_keep_open: None,
            templates: MessageTemplates::default(),
        }
    }

    #[test]
    fn test_plan_stable_release() {
        let forge = MockForge::new();
        let record = MergedPullRequest::new(10, [5]);
        let actions = plan_actions(&forge, &record, &options(true));

        assert_eq!(actions.len(), 5);
        assert_eq!(actions[0].to_string(), "comment on pull request #10");
        assert_eq!(
            actions[1].to_string(),
            "remove label 'awaiting release' from pull request #10"
        );
        assert_eq!(actions[2].to_string(), "comment on issue #5");
        assert_eq!(actions[3], NotifyAction::CloseIssue(5));
        assert_eq!(
            actions[4].to_string(),
            "remove label 'awaiting release' from issue #5"
        );
    }

    #[test]
    fn test_plan_prerelease_keeps_labels() {
        let forge = MockForge::new();
        let record = MergedPullRequest::new(10, [5]);
        let actions = plan_actions(&forge, &record, &options(false));

        assert!(!actions
            .iter()
            .any(|a| matches!(a, NotifyAction::RemoveLabel { .. })));
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn test_plan_keep_open_label() {
        let mut forge = MockForge::new();
        forge.set_labels(5, &["bug", "keep open"]);
        forge.set_labels(6, &["bug"]);

        let mut opts = options(false);
        opts.issue_label_to_keep_open = Some("keep open".to_string());

        let record = MergedPullRequest::new(10, [5, 6]);
        let actions = plan_actions(&forge, &record, &opts);

        assert!(!actions.contains(&NotifyAction::CloseIssue(5)));
        assert!(actions.contains(&NotifyAction::CloseIssue(6)));
        assert!(forge.calls().iter().all(|c| !c.is_mutation()));
    }

    #[test]
    fn test_plan_label_read_failure_closes() {
        let mut forge = MockForge::new();
        forge.fail(Operation::IssueLabels, 5);

        let mut opts = options(false);
        opts.issue_label_to_keep_open = Some("keep open".to_string());

        let actions = plan_actions(&forge, &MergedPullRequest::new(10, [5]), &opts);
        assert!(actions.contains(&NotifyAction::CloseIssue(5)));
    }

    #[test]
    fn test_plan_skips_label_reads_without_keep_open() {
        let forge = MockForge::new();
        plan_actions(&forge, &MergedPullRequest::new(10, [5, 6]), &options(true));
        assert!(!forge
            .calls()
            .iter()
            .any(|c| matches!(c, ForgeCall::IssueLabels(_))));
    }

    #[test]
    fn test_execute_dispatches_to_forge() {
        let forge = MockForge::new();
        NotifyAction::CloseIssue(3).execute(&forge).unwrap();
        assert_eq!(forge.calls(), vec![ForgeCall::CloseIssue(3)]);
    }
}
