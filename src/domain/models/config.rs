use serde::{Deserialize, Serialize};

use super::check::CheckOptions;

/// Main configuration structure for buildchecker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Buildkite API access
    #[serde(default)]
    pub buildkite: BuildkiteConfig,

    /// GitHub API access and target repository
    #[serde(default)]
    pub github: GitHubConfig,

    /// Slack webhooks for announcements
    #[serde(default)]
    pub slack: SlackConfig,

    /// Honeycomb export settings (history only)
    #[serde(default)]
    pub honeycomb: HoneycombConfig,

    /// Failure detection settings
    #[serde(default)]
    pub check: CheckConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Buildkite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildkiteConfig {
    /// API token with `read_builds` scope
    #[serde(default)]
    pub token: String,

    /// Organization slug
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Pipeline slug
    #[serde(default = "default_pipeline")]
    pub pipeline: String,

    /// API base URL
    #[serde(default = "default_buildkite_url")]
    pub base_url: String,
}

fn default_organization() -> String {
    "sourcegraph".to_string()
}

fn default_pipeline() -> String {
    "sourcegraph".to_string()
}

fn default_buildkite_url() -> String {
    "https://api.buildkite.com".to_string()
}

impl Default for BuildkiteConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            organization: default_organization(),
            pipeline: default_pipeline(),
            base_url: default_buildkite_url(),
        }
    }
}

/// GitHub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Token with admin access to branch protection
    #[serde(default)]
    pub token: String,

    /// Repository owner (also the organization checked for membership)
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name
    #[serde(default = "default_repo")]
    pub repo: String,

    /// API base URL
    #[serde(default = "default_github_url")]
    pub base_url: String,
}

fn default_owner() -> String {
    "sourcegraph".to_string()
}

fn default_repo() -> String {
    "sourcegraph".to_string()
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: default_owner(),
            repo: default_repo(),
            base_url: default_github_url(),
        }
    }
}

/// Slack configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Incoming webhook URLs; every message is posted to each of them
    #[serde(default)]
    pub webhooks: Vec<String>,
}

/// Honeycomb configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HoneycombConfig {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub dataset: String,

    #[serde(default = "default_honeycomb_url")]
    pub base_url: String,
}

fn default_honeycomb_url() -> String {
    "https://api.honeycomb.io".to_string()
}

impl Default for HoneycombConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            dataset: String::new(),
            base_url: default_honeycomb_url(),
        }
    }
}

impl HoneycombConfig {
    /// Export is enabled only when both a token and a dataset are set.
    pub fn is_enabled(&self) -> bool {
        !self.token.is_empty() && !self.dataset.is_empty()
    }
}

/// Failure detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckConfig {
    /// Branch to monitor and lock
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Consecutive failures needed to lock the branch
    #[serde(default = "default_failures_threshold")]
    pub failures_threshold: usize,

    /// Minutes after which a running build is considered failed (0 disables)
    #[serde(default = "default_failures_timeout_mins")]
    pub failures_timeout_mins: i64,

    /// GitHub team always granted push access while the branch is locked
    #[serde(default = "default_fallback_team")]
    pub fallback_team: String,

    /// YAML team directory used to resolve commit authors to Slack users
    #[serde(default)]
    pub team_directory: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

const fn default_failures_threshold() -> usize {
    3
}

/// Largest timeout that still fits a `chrono::Duration` (about 17 million years).
pub const MAX_FAILURES_TIMEOUT_MINS: i64 = i64::MAX / 60_000;

const fn default_failures_timeout_mins() -> i64 {
    60
}

fn default_fallback_team() -> String {
    "dev-experience".to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            failures_threshold: default_failures_threshold(),
            failures_timeout_mins: default_failures_timeout_mins(),
            fallback_team: default_fallback_team(),
            team_directory: None,
        }
    }
}

impl CheckConfig {
    /// Out-of-range timeouts saturate; `ConfigLoader::validate` rejects them first.
    pub fn options(&self) -> CheckOptions {
        let timeout = chrono::Duration::try_minutes(self.failures_timeout_mins).unwrap_or(
            if self.failures_timeout_mins < 0 {
                chrono::Duration::zero()
            } else {
                chrono::Duration::MAX
            },
        );
        CheckOptions::new(self.failures_threshold, timeout)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
