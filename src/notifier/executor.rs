use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::MergedPullRequest;
use crate::error::{NotifyError, Result};
use crate::forge::{Forge, TargetKind};
use crate::notifier::plan::{plan_actions, NotifyAction, NotifyOptions};

/// What a notification run did (or, in dry-run mode, would have done)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub dry_run: bool,
    pub pull_requests: usize,
    pub issues_commented: usize,
    pub issues_closed: usize,
    pub labels_removed: usize,
    pub actions: Vec<NotifyAction>,
}

impl NotifySummary {
    fn record(&mut self, actions: Vec<NotifyAction>) {
        self.pull_requests += 1;
        for action in &actions {
            match action {
                NotifyAction::Comment {
                    kind: TargetKind::Issue,
                    ..
                } => self.issues_commented += 1,
                NotifyAction::CloseIssue(_) => self.issues_closed += 1,
                NotifyAction::RemoveLabel { .. } => self.labels_removed += 1,
                NotifyAction::Comment { .. } => {}
            }
        }
        self.actions.extend(actions);
    }
}

/// Posts release notifications for resolved pull requests
pub struct Notifier<'a, F: Forge> {
    forge: &'a F,
    options: NotifyOptions,
    dry_run: bool,
}

impl<'a, F: Forge> Notifier<'a, F> {
    pub fn new(forge: &'a F, options: NotifyOptions, dry_run: bool) -> Self {
        Notifier {
            forge,
            options,
            dry_run,
        }
    }

    /// Notify every pull request, one at a time.
    ///
    /// Within one pull request all mutations run concurrently and every
    /// outcome is collected before inspection. If any failed the run stops
    /// with [NotifyError::Notification] listing all of them; successful
    /// mutations are not rolled back.
    ///
    /// In dry-run mode actions are only logged.
    pub fn notify(&self, records: &[MergedPullRequest]) -> Result<NotifySummary> {
        let mut summary = NotifySummary {
            dry_run: self.dry_run,
            ..NotifySummary::default()
        };

        for record in records {
            let actions = plan_actions(self.forge, record, &self.options);

            if self.dry_run {
                for action in &actions {
                    info!(pr = record.number, "dry run: would {}", action);
                }
            } else {
                self.execute(record, &actions)?;
            }

            summary.record(actions);
        }

        Ok(summary)
    }

    fn execute(&self, record: &MergedPullRequest, actions: &[NotifyAction]) -> Result<()> {
        let failures: Vec<String> = actions
            .par_iter()
            .map(|action| {
                action
                    .execute(self.forge)
                    .map_err(|e| format!("{}: {}", action, e))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|outcome| outcome.err())
            .collect();

        if !failures.is_empty() {
            for failure in &failures {
                warn!(pr = record.number, "notification failed: {}", failure);
            }
            return Err(NotifyError::Notification(failures));
        }

        info!(
            pr = record.number,
            issues = record.issues.len(),
            "notified pull request"
        );
        Ok(())
    }
}
