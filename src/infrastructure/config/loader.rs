use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, MAX_FAILURES_TIMEOUT_MINS};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid failures_threshold: {0}. Must be at least 1")]
    InvalidFailuresThreshold(usize),

    #[error("Invalid failures_timeout_mins: {0}. Must be between 0 and {max}", max = MAX_FAILURES_TIMEOUT_MINS)]
    InvalidFailuresTimeout(i64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Branch name cannot be empty")]
    EmptyBranch,

    #[error("Missing required {0} token")]
    MissingToken(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .buildchecker/config.yaml
    /// 3. .buildchecker/local.yaml (optional overrides)
    /// 4. Environment variables (BUILDCHECKER_* prefix, `__` for nesting)
    ///
    /// Command-line flags are applied on top by the CLI layer.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".buildchecker/config.yaml"))
            .merge(Yaml::file(".buildchecker/local.yaml"))
            .merge(Env::prefixed("BUILDCHECKER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("BUILDCHECKER_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Tokens are not checked here since each subcommand needs a different
    /// set; see [`require_check_credentials`](Self::require_check_credentials)
    /// and [`require_history_credentials`](Self::require_history_credentials).
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.check.failures_threshold == 0 {
            return Err(ConfigError::InvalidFailuresThreshold(
                config.check.failures_threshold,
            ));
        }

        if !(0..=MAX_FAILURES_TIMEOUT_MINS).contains(&config.check.failures_timeout_mins) {
            return Err(ConfigError::InvalidFailuresTimeout(
                config.check.failures_timeout_mins,
            ));
        }

        if config.check.branch.trim().is_empty() {
            return Err(ConfigError::EmptyBranch);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        for webhook in &config.slack.webhooks {
            if !webhook.starts_with("http://") && !webhook.starts_with("https://") {
                return Err(ConfigError::ValidationFailed(
                    "Slack webhook must be an http(s) URL".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// `check` reads builds from Buildkite and edits branch protection on GitHub.
    pub fn require_check_credentials(config: &Config, dry_run: bool) -> Result<(), ConfigError> {
        if config.buildkite.token.is_empty() {
            return Err(ConfigError::MissingToken("Buildkite"));
        }
        if !dry_run && config.github.token.is_empty() {
            return Err(ConfigError::MissingToken("GitHub"));
        }
        Ok(())
    }

    /// `history` only needs Buildkite access when it is not replaying a cache file.
    pub fn require_history_credentials(
        config: &Config,
        loading_from_cache: bool,
    ) -> Result<(), ConfigError> {
        if !loading_from_cache && config.buildkite.token.is_empty() {
            return Err(ConfigError::MissingToken("Buildkite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.check.branch, "main");
        assert_eq!(config.check.failures_threshold, 3);
        assert_eq!(config.check.failures_timeout_mins, 60);
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
buildkite:
  token: bk-token
  pipeline: monorepo
github:
  owner: acme
  repo: widgets
slack:
  webhooks:
    - https://hooks.slack.com/services/T000/B000/XXXX
check:
  branch: trunk
  failures_threshold: 5
  failures_timeout_mins: 90
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.buildkite.token, "bk-token");
        assert_eq!(config.buildkite.pipeline, "monorepo");
        assert_eq!(config.buildkite.organization, "sourcegraph");
        assert_eq!(config.github.owner, "acme");
        assert_eq!(config.slack.webhooks.len(), 1);
        assert_eq!(config.check.branch, "trunk");
        assert_eq!(config.check.failures_threshold, 5);
        assert_eq!(config.check.options().build_timeout, chrono::Duration::minutes(90));
        assert_eq!(config.check.fallback_team, "dev-experience");
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let file = write_config("check:\n  failures_threshold: 4\n");

        temp_env::with_vars(
            [
                ("BUILDCHECKER_CHECK__BRANCH", Some("release")),
                ("BUILDCHECKER_BUILDKITE__TOKEN", Some("from-env")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).expect("config loads");
                assert_eq!(config.check.failures_threshold, 4);
                assert_eq!(config.check.branch, "release");
                assert_eq!(config.buildkite.token, "from-env");
            },
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ConfigLoader::load_from_file("/definitely/not/here.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let file = write_config("check:\n  failures_threshold: 0\n");
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failures_threshold"));
    }

    #[test]
    fn test_validate_zero_threshold() {
        let mut config = Config::default();
        config.check.failures_threshold = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFailuresThreshold(0)
        ));
    }

    #[test]
    fn test_validate_negative_timeout() {
        let mut config = Config::default();
        config.check.failures_timeout_mins = -1;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFailuresTimeout(-1)
        ));
    }

    #[test]
    fn test_validate_oversized_timeout() {
        let mut config = Config::default();
        config.check.failures_timeout_mins = i64::MAX;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFailuresTimeout(i64::MAX)
        ));
        assert_eq!(config.check.options().build_timeout, chrono::Duration::MAX);

        config.check.failures_timeout_mins = MAX_FAILURES_TIMEOUT_MINS;
        ConfigLoader::validate(&config).expect("largest timeout is accepted");
        assert_eq!(
            config.check.options().build_timeout,
            chrono::Duration::minutes(MAX_FAILURES_TIMEOUT_MINS)
        );
    }

    #[test]
    fn test_load_from_file_rejects_oversized_timeout() {
        let file = write_config("check:\n  failures_timeout_mins: 9223372036854775807\n");
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failures_timeout_mins"));
    }

    #[test]
    fn test_validate_empty_branch() {
        let mut config = Config::default();
        config.check.branch = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyBranch
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_bad_webhook() {
        let mut config = Config::default();
        config.slack.webhooks = vec!["hooks.slack.com/services/x".to_string()];
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ValidationFailed(_)
        ));
    }

    #[test]
    fn test_check_requires_tokens() {
        let mut config = Config::default();
        assert!(matches!(
            ConfigLoader::require_check_credentials(&config, false).unwrap_err(),
            ConfigError::MissingToken("Buildkite")
        ));

        config.buildkite.token = "bk".to_string();
        assert!(matches!(
            ConfigLoader::require_check_credentials(&config, false).unwrap_err(),
            ConfigError::MissingToken("GitHub")
        ));
        assert!(ConfigLoader::require_check_credentials(&config, true).is_ok());
    }

    #[test]
    fn test_history_from_cache_needs_no_token() {
        let config = Config::default();
        assert!(ConfigLoader::require_history_credentials(&config, true).is_ok());
        assert!(ConfigLoader::require_history_credentials(&config, false).is_err());
    }
}
