use clap::builder::FalseyValueParser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Command-line arguments; most fall back to the CI environment variables
/// a release workflow exports.
///
/// Boolean switches accept an optional value (`--dry-run`, `--dry-run=false`)
/// so an explicit false from the environment overrides the config file.
#[derive(clap::Parser, Debug, Clone, PartialEq)]
#[command(
    name = "release-notifier",
    version,
    about = "Comment on the pull requests and issues shipped in a release"
)]
pub struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Forge repository as owner/name")]
    pub repository: Option<String>,

    #[arg(
        long,
        env = "PACKAGE_VERSION_TO_FOLLOW",
        help = "Track <package>@<version> tags only"
    )]
    pub package: Option<String>,

    #[arg(
        long,
        env = "DIRECTORY_TO_CHECK",
        help = "Only scan commits touching this directory"
    )]
    pub directory: Option<String>,

    #[arg(
        long,
        env = "INCLUDE_NIGHTLY",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = FalseyValueParser::new(),
        help = "Include nightly tags"
    )]
    pub include_nightly: Option<bool>,

    #[arg(
        long,
        env = "DRY_RUN",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = FalseyValueParser::new(),
        help = "Log intended actions without changing anything"
    )]
    pub dry_run: Option<bool>,

    #[arg(
        long,
        env = "PR_LABELS_TO_REMOVE",
        help = "Label removed from pull requests on stable releases"
    )]
    pub pr_label_to_remove: Option<String>,

    #[arg(
        long,
        env = "ISSUE_LABELS_TO_REMOVE",
        help = "Label removed from issues on stable releases"
    )]
    pub issue_label_to_remove: Option<String>,

    #[arg(
        long,
        env = "ISSUE_LABELS_TO_KEEP_OPEN",
        help = "Issues with this label are not closed"
    )]
    pub issue_label_to_keep_open: Option<String>,

    #[arg(long, help = "Path inside the git repository [default: .]")]
    pub repo_path: Option<PathBuf>,
}

impl Args {
    /// The subset of arguments that override the configuration file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repository: self.repository.clone(),
            package: self.package.clone(),
            directory: self.directory.clone(),
            include_nightly: self.include_nightly,
            dry_run: self.dry_run,
            pr_label_to_remove: self.pr_label_to_remove.clone(),
            issue_label_to_remove: self.issue_label_to_remove.clone(),
            issue_label_to_keep_open: self.issue_label_to_keep_open.clone(),
            repo_path: self.repo_path.clone(),
        }
    }
}
