//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::Config;

#[derive(Parser, Debug)]
#[command(name = "buildchecker")]
#[command(about = "Watches CI on a branch, locks it while builds stay red, reports build health")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read configuration from this YAML file instead of .buildchecker/
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check recent builds and lock or unlock the branch
    Check(CheckArgs),

    /// Aggregate build history into daily totals, flakes and incident minutes
    History(HistoryArgs),
}

/// Flags shared by both subcommands.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Buildkite API token
    #[arg(long, env = "BUILDKITE_TOKEN", hide_env_values = true)]
    pub buildkite_token: Option<String>,

    /// Buildkite pipeline slug
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Branch to watch
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Consecutive failed builds that count as a broken branch
    #[arg(long)]
    pub failures_threshold: Option<usize>,

    /// Minutes after which a build still running is treated as failed (0 disables)
    #[arg(long)]
    pub failures_timeout_mins: Option<i64>,

    /// Slack incoming webhook URL (repeatable)
    #[arg(
        long = "slack-webhook",
        env = "SLACK_WEBHOOK",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub slack_webhooks: Vec<String>,
}

impl BuildArgs {
    /// Apply explicit flags on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(token) = &self.buildkite_token {
            config.buildkite.token.clone_from(token);
        }
        if let Some(pipeline) = &self.pipeline {
            config.buildkite.pipeline.clone_from(pipeline);
        }
        if let Some(branch) = &self.branch {
            config.check.branch.clone_from(branch);
        }
        if let Some(threshold) = self.failures_threshold {
            config.check.failures_threshold = threshold;
        }
        if let Some(timeout) = self.failures_timeout_mins {
            config.check.failures_timeout_mins = timeout;
        }
        if !self.slack_webhooks.is_empty() {
            config.slack.webhooks.clone_from(&self.slack_webhooks);
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// GitHub token with admin access to the repository
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Team that may always push while the branch is locked
    #[arg(long)]
    pub fallback_team: Option<String>,

    /// YAML team directory used to mention commit authors on Slack
    #[arg(long, value_name = "PATH")]
    pub team_directory: Option<PathBuf>,

    /// Compute the outcome without touching branch protection or Slack
    #[arg(long)]
    pub dry_run: bool,
}

impl CheckArgs {
    pub fn apply(&self, config: &mut Config) {
        self.build.apply(config);
        if let Some(token) = &self.github_token {
            config.github.token.clone_from(token);
        }
        if let Some(team) = &self.fallback_team {
            config.check.fallback_team.clone_from(team);
        }
        if let Some(path) = &self.team_directory {
            config.check.team_directory = Some(path.display().to_string());
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// First day of the window (YYYY-MM-DD); defaults to a week before --created-to
    #[arg(long, value_name = "DATE")]
    pub created_from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD); defaults to today
    #[arg(long, value_name = "DATE")]
    pub created_to: Option<NaiveDate>,

    /// Read builds from a JSON file instead of Buildkite
    #[arg(long, value_name = "PATH")]
    pub load_from: Option<PathBuf>,

    /// Save fetched builds to a JSON file
    #[arg(long, value_name = "PATH")]
    pub write_to: Option<PathBuf>,

    /// Write totals.csv, flakes.csv and incidents.csv into this directory
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Honeycomb dataset to send daily events to
    #[arg(long)]
    pub honeycomb_dataset: Option<String>,

    /// Honeycomb API key
    #[arg(long, env = "HONEYCOMB_TOKEN", hide_env_values = true)]
    pub honeycomb_token: Option<String>,
}

impl HistoryArgs {
    pub fn apply(&self, config: &mut Config) {
        self.build.apply(config);
        if let Some(dataset) = &self.honeycomb_dataset {
            config.honeycomb.dataset.clone_from(dataset);
        }
        if let Some(token) = &self.honeycomb_token {
            config.honeycomb.token.clone_from(token);
        }
    }
}
