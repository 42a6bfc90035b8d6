use serde::{Deserialize, Serialize};

use crate::forge::TargetKind;

fn default_pull_request_template() -> String {
    "🤖 Hello there,\n\n\
     We just published version `{version}` which includes this pull request. \
     If you'd like to take it for a test run please try it out and let us know what you think!\n\n\
     Thanks!"
        .to_string()
}

fn default_issue_template() -> String {
    "🤖 Hello there,\n\n\
     We just published version `{version}` which involves this issue. \
     If you'd like to take it for a test run please try it out and let us know what you think!\n\n\
     Thanks!"
        .to_string()
}

/// Comment templates; `{version}` is replaced with the published version
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessageTemplates {
    #[serde(default = "default_pull_request_template")]
    pub pull_request: String,

    #[serde(default = "default_issue_template")]
    pub issue: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        MessageTemplates {
            pull_request: default_pull_request_template(),
            issue: default_issue_template(),
        }
    }
}

impl MessageTemplates {
    /// Render the comment for a pull request or issue
    pub fn render(&self, kind: TargetKind, version: &str) -> String {
        let template = match kind {
            TargetKind::PullRequest => &self.pull_request,
            TargetKind::Issue => &self.issue,
        };
        template.replace("{version}", version)
    }
}
