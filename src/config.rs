use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NotifyError, Result};
use crate::notifier::MessageTemplates;

/// File name searched in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-notifier.toml";

/// Represents the complete configuration for release-notifier.
///
/// Built once at startup from defaults, an optional TOML file and CLI/env
/// overrides, then passed by reference into every stage.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// `owner/name` of the forge repository; required
    #[serde(default)]
    pub repository: Option<String>,

    /// Package whose `<package>@<version>` tags are tracked; all tags when absent
    #[serde(default)]
    pub package: Option<String>,

    /// Only commits touching this directory are scanned
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub include_nightly: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub pr_label_to_remove: Option<String>,

    #[serde(default)]
    pub issue_label_to_remove: Option<String>,

    #[serde(default)]
    pub issue_label_to_keep_open: Option<String>,

    /// Path inside the git repository to open
    #[serde(default = "default_repo_path")]
    pub repo_path: PathBuf,

    #[serde(default)]
    pub messages: MessageTemplates,
}

fn default_repo_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: None,
            package: None,
            directory: None,
            include_nightly: false,
            dry_run: false,
            pr_label_to_remove: None,
            issue_label_to_remove: None,
            issue_label_to_keep_open: None,
            repo_path: default_repo_path(),
            messages: MessageTemplates::default(),
        }
    }
}

/// Values supplied on the command line or through the environment.
///
/// `None` leaves the file value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub repository: Option<String>,
    pub package: Option<String>,
    pub directory: Option<String>,
    pub include_nightly: Option<bool>,
    pub dry_run: Option<bool>,
    pub pr_label_to_remove: Option<String>,
    pub issue_label_to_remove: Option<String>,
    pub issue_label_to_keep_open: Option<String>,
    pub repo_path: Option<PathBuf>,
}

/// Treat blank strings as absent; CI systems export unset inputs as ""
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Layer overrides on top of this configuration
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        fn pick(over: Option<String>, base: Option<String>) -> Option<String> {
            non_blank(over).or_else(|| non_blank(base))
        }

        self.repository = pick(overrides.repository, self.repository);
        self.package = pick(overrides.package, self.package);
        self.directory = pick(overrides.directory, self.directory);
        self.pr_label_to_remove = pick(overrides.pr_label_to_remove, self.pr_label_to_remove);
        self.issue_label_to_remove =
            pick(overrides.issue_label_to_remove, self.issue_label_to_remove);
        self.issue_label_to_keep_open =
            pick(overrides.issue_label_to_keep_open, self.issue_label_to_keep_open);
        self.include_nightly = overrides.include_nightly.unwrap_or(self.include_nightly);
        self.dry_run = overrides.dry_run.unwrap_or(self.dry_run);
        if let Some(path) = overrides.repo_path {
            self.repo_path = path;
        }
        self
    }

    /// Check required repository identity.
    ///
    /// # Returns
    /// * `Ok(&str)` - The `owner/name` repository
    /// * `Err(NotifyError::Config)` - Missing or malformed repository
    pub fn validate(&self) -> Result<&str> {
        let repository = self.repository.as_deref().ok_or_else(|| {
            NotifyError::config(
                "repository is required (set --repository or GITHUB_REPOSITORY)",
            )
        })?;

        match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(repository)
            }
            _ => Err(NotifyError::config(format!(
                "repository '{}' must be of the form owner/name",
                repository
            ))),
        }
    }

    /// The directory filter as a path, if any
    pub fn directory_path(&self) -> Option<&Path> {
        self.directory.as_deref().map(Path::new)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-notifier.toml` in current directory
/// 3. `release-notifier.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| NotifyError::config(format!("Invalid configuration file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.repository, None);
        assert!(!config.dry_run);
        assert_eq!(config.repo_path, PathBuf::from("."));
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
repository = "remix-run/remix"
package = "remix"
directory = "packages"
issue_label_to_keep_open = "keep open"

[messages]
issue = "Released in {version}"
"#,
        )
        .unwrap();

        assert_eq!(config.repository.as_deref(), Some("remix-run/remix"));
        assert_eq!(config.directory_path(), Some(Path::new("packages")));
        assert_eq!(config.messages.issue, "Released in {version}");
        assert_eq!(config.messages.pull_request, MessageTemplates::default().pull_request);
    }

    #[test]
    fn test_merge_overrides_win() {
        let base = Config {
            repository: Some("a/b".to_string()),
            package: Some("remix".to_string()),
            ..Config::default()
        };
        let merged = base.merge(ConfigOverrides {
            repository: Some("c/d".to_string()),
            dry_run: Some(true),
            ..ConfigOverrides::default()
        });

        assert_eq!(merged.repository.as_deref(), Some("c/d"));
        assert_eq!(merged.package.as_deref(), Some("remix"));
        assert!(merged.dry_run);
    }

    #[test]
    fn test_merge_explicit_false_wins() {
        let base = Config {
            dry_run: true,
            include_nightly: true,
            ..Config::default()
        };
        let merged = base.merge(ConfigOverrides {
            dry_run: Some(false),
            ..ConfigOverrides::default()
        });

        assert!(!merged.dry_run);
        assert!(merged.include_nightly);
    }

    #[test]
    fn test_merge_blank_is_absent() {
        let base = Config {
            package: Some("remix".to_string()),
            directory: Some("  ".to_string()),
            ..Config::default()
        };
        let merged = base.merge(ConfigOverrides {
            package: Some("".to_string()),
            issue_label_to_remove: Some(" ".to_string()),
            ..ConfigOverrides::default()
        });

        assert_eq!(merged.package.as_deref(), Some("remix"));
        assert_eq!(merged.directory, None);
        assert_eq!(merged.issue_label_to_remove, None);
    }

    #[test]
    fn test_validate_requires_repository() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[test]
    fn test_validate_repository_shape() {
        let mut config = Config::default();
        for bad in ["remix", "/remix", "remix/", "a/b/c"] {
            config.repository = Some(bad.to_string());
            assert!(config.validate().is_err(), "{} should be rejected", bad);
        }

        config.repository = Some("remix-run/remix".to_string());
        assert_eq!(config.validate().unwrap(), "remix-run/remix");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "repository = [").unwrap();

        let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }
}
