use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_notifier::cli::{notify_release, resolve_release, Args};
use release_notifier::config;
use release_notifier::forge::GhCli;
use release_notifier::git::Git2Repository;
use release_notifier::ui;

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    // Load configuration, then layer CLI/env values on top
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg.merge(args.overrides()),
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repository = match config.validate() {
        Ok(repository) => repository.to_string(),
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let git_repo = match Git2Repository::open(&config.repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    let forge = GhCli::new(repository);

    if config.dry_run {
        ui::display_status("Dry run enabled, nothing will be changed on the forge");
    }

    let release = match resolve_release(&config, &git_repo, &forge) {
        Ok(release) => release,
        Err(e) => {
            ui::display_error(&format!("Failed to resolve release: {}", e));
            std::process::exit(1);
        }
    };

    ui::display_release_delta(&release.delta);
    ui::display_status(&format!("Scanned {} commit(s)", release.commit_count));
    ui::display_pull_requests(&release.pull_requests);

    if release.pull_requests.is_empty() {
        ui::display_warning("No merged pull requests found for this release");
    }

    match notify_release(&config, &forge, &release) {
        Ok(summary) => ui::display_summary(&summary),
        Err(e) => {
            ui::display_error(&format!("Failed to notify: {}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Console logging on stderr, controlled by RUST_LOG (default: info)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
