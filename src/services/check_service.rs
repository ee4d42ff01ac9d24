//! Check orchestration: decide whether the monitored branch should be locked.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Build, CheckOptions, CheckResults};
use crate::domain::ports::{BranchLocker, TeammateResolver};
use crate::services::build_classifier::{is_failed_at, is_passed, is_scheduled};
use crate::services::failure_scanner::find_consecutive_failures_at;

/// Runs one check pass against injected collaborators.
pub struct CheckService {
    locker: Arc<dyn BranchLocker>,
    teammates: Arc<dyn TeammateResolver>,
    fallback_team: String,
}

impl CheckService {
    pub fn new(
        locker: Arc<dyn BranchLocker>,
        teammates: Arc<dyn TeammateResolver>,
        fallback_team: impl Into<String>,
    ) -> Self {
        Self {
            locker,
            teammates,
            fallback_team: fallback_team.into(),
        }
    }

    /// Inspect `builds` (newest first) and prepare a lock or unlock.
    ///
    /// Errors from the locker are returned; teammate lookups that fail only
    /// drop the chat mention for that commit.
    #[instrument(skip_all, fields(builds = builds.len(), threshold = opts.failures_threshold))]
    pub async fn check_builds(
        &self,
        builds: &[Build],
        opts: &CheckOptions,
    ) -> DomainResult<CheckResults> {
        let now = Utc::now();
        let mut results = CheckResults::default();

        // Find the most recent build with a conclusive state.
        let mut first_failed_index = 0;
        for (index, build) in builds.iter().enumerate() {
            if is_scheduled(build) {
                continue;
            }
            if is_passed(build) {
                info!(build_number = build.number, "most recent finished build passed");
                results.action = self.locker.unlock().await?;
                return Ok(results);
            }
            if is_failed_at(build, opts.build_timeout, now) {
                info!(build_number = build.number, "most recent finished build failed");
                first_failed_index = index;
                break;
            }
        }

        // Start one earlier so a passed build right before the failure is not skipped.
        let outcome = find_consecutive_failures_at(
            &builds[first_failed_index.saturating_sub(1)..],
            opts.failures_threshold,
            opts.build_timeout,
            now,
        );
        results.failed_commits = outcome.failed_commits;

        if !outcome.threshold_exceeded {
            info!(
                failures = results.failed_commits.len(),
                "threshold not exceeded"
            );
            results.action = self.locker.unlock().await?;
            return Ok(results);
        }
        warn!(
            failures = results.failed_commits.len(),
            "consecutive failure threshold exceeded"
        );

        // Keep the oldest `threshold` failures of the run.
        let excess = results
            .failed_commits
            .len()
            .saturating_sub(opts.failures_threshold);
        results.failed_commits.drain(..excess);

        for commit in &mut results.failed_commits {
            match self.teammates.resolve_by_commit_author(commit).await {
                Ok(teammate) => commit.slack_user_id = teammate.slack_id,
                Err(err) => warn!(
                    commit = %commit.commit,
                    author = %commit.author,
                    error = %err,
                    "unable to resolve teammate"
                ),
            }
        }

        results.action = self
            .locker
            .lock(&results.failed_commits, &self.fallback_team)
            .await?;
        results.lock_branch = true;

        Ok(results)
    }
}
