//! `buildchecker check`: lock the branch while it is red, unlock it once green.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::memory::{InMemoryBranchLocker, InMemoryNotifier};
use crate::cli::output::{commits_table, output, CommandOutput};
use crate::cli::types::CheckArgs;
use crate::domain::models::{CommitInfo, Config};
use crate::domain::ports::{BranchLocker, BuildQuery, BuildSource, Notifier, TeammateResolver};
use crate::infrastructure::buildkite::BuildkiteClient;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::github::{GitHubBranchLocker, GitHubClient};
use crate::infrastructure::logging::SecretScrubber;
use crate::infrastructure::slack::SlackWebhookNotifier;
use crate::infrastructure::team::TeamDirectory;
use crate::services::report::{action_failed_message, lock_message, unlock_message};
use crate::services::CheckService;

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub branch: String,
    pub builds_checked: usize,
    pub lock_branch: bool,
    /// Description of the change made (or that would be made on a dry run)
    pub action: Option<String>,
    pub applied: bool,
    pub dry_run: bool,
    pub failed_commits: Vec<CommitInfo>,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let state = if self.lock_branch { "red" } else { "green" };
        let mut lines = vec![format!(
            "Checked {} builds on {}: {state}",
            self.builds_checked, self.branch
        )];

        match (&self.action, self.dry_run) {
            (Some(action), true) => lines.push(format!("Would {action} (dry run)")),
            (Some(action), false) => lines.push(format!("Applied: {action}")),
            (None, _) => lines.push("Branch already in the desired state".to_string()),
        }

        if !self.failed_commits.is_empty() {
            let rows: Vec<(u64, String, String)> = self
                .failed_commits
                .iter()
                .map(|c| (c.build_number, c.short_commit().to_string(), c.author.clone()))
                .collect();
            lines.push(commits_table(&rows));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Collaborators of one check pass.
pub struct CheckContext {
    pub builds: Arc<dyn BuildSource>,
    pub locker: Arc<dyn BranchLocker>,
    pub teammates: Arc<dyn TeammateResolver>,
    pub notifier: Arc<dyn Notifier>,
    pub dry_run: bool,
}

pub async fn execute(args: CheckArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config)?;
    ConfigLoader::require_check_credentials(&config, args.dry_run)?;

    let teammates: Arc<dyn TeammateResolver> = match &config.check.team_directory {
        Some(path) => Arc::new(
            TeamDirectory::load(path)
                .await
                .with_context(|| format!("Failed to load team directory {path}"))?,
        ),
        None => Arc::new(TeamDirectory::default()),
    };

    let branch = config.check.branch.clone();
    let (locker, notifier): (Arc<dyn BranchLocker>, Arc<dyn Notifier>) = if args.dry_run {
        (
            Arc::new(InMemoryBranchLocker::new(branch)),
            Arc::new(InMemoryNotifier::new()),
        )
    } else {
        let client = Arc::new(GitHubClient::from_config(&config.github));
        (
            Arc::new(GitHubBranchLocker::new(
                client,
                config.github.owner.clone(),
                config.github.repo.clone(),
                branch,
            )),
            Arc::new(SlackWebhookNotifier::new(config.slack.webhooks.clone())),
        )
    };

    let context = CheckContext {
        builds: Arc::new(BuildkiteClient::new(&config.buildkite)),
        locker,
        teammates,
        notifier,
        dry_run: args.dry_run,
    };

    let out = run_check(&config, context).await?;
    output(&out, json_mode);
    Ok(())
}

/// Fetch the latest builds, decide, apply the resulting action and announce it.
///
/// A failed action is announced too, then returned as an error.
pub async fn run_check(config: &Config, context: CheckContext) -> Result<CheckOutput> {
    let branch = &config.check.branch;

    let builds = context
        .builds
        .list_builds(&BuildQuery::latest(branch.as_str()))
        .await
        .context("Failed to list builds")?;
    info!(branch = %branch, count = builds.len(), "fetched builds");

    let service = CheckService::new(
        context.locker,
        context.teammates,
        config.check.fallback_team.clone(),
    );
    let results = service
        .check_builds(&builds, &config.check.options())
        .await
        .context("Failed to check builds")?;

    let mut out = CheckOutput {
        branch: branch.clone(),
        builds_checked: builds.len(),
        lock_branch: results.lock_branch,
        action: results.action.as_ref().map(|a| a.description().to_string()),
        applied: false,
        dry_run: context.dry_run,
        failed_commits: results.failed_commits,
    };

    let Some(action) = results.action else {
        info!(branch = %branch, locked = out.lock_branch, "branch already in desired state");
        return Ok(out);
    };

    let description = action.description().to_string();
    if let Err(e) = action.apply().await {
        let error = SecretScrubber::new().scrub_message(&e.to_string());
        let message = action_failed_message(&description, &error);
        if let Err(post_err) = context.notifier.post(&message).await {
            warn!(error = %post_err, "failed to announce failed branch action");
        }
        return Err(anyhow::Error::new(e).context(format!("Failed to {description}")));
    }
    out.applied = true;
    info!(action = %description, "applied branch action");

    let message = if out.lock_branch {
        let repo_url = format!("https://github.com/{}/{}", config.github.owner, config.github.repo);
        lock_message(branch, &repo_url, &out.failed_commits)
    } else {
        unlock_message(branch)
    };
    if let Err(e) = context.notifier.post(&message).await {
        warn!(error = %e, "failed to announce branch action");
    }

    Ok(out)
}
