//! Value objects for a single check pass.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ports::BranchAction;

/// Tuning knobs for failure detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Number of consecutive failures that makes a run lockable.
    pub failures_threshold: usize,
    /// A build still running after this long is treated as failed.
    /// Zero disables the inference.
    pub build_timeout: Duration,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            failures_threshold: 3,
            build_timeout: Duration::minutes(60),
        }
    }
}

impl CheckOptions {
    pub fn new(failures_threshold: usize, build_timeout: Duration) -> Self {
        Self {
            failures_threshold,
            build_timeout,
        }
    }
}

/// Summary of one failing build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub commit: String,
    /// `Name (email)` of the commit author, empty when unknown.
    pub author: String,
    pub build_number: u64,
    pub build_url: String,
    pub build_created: Option<DateTime<Utc>>,
    /// Chat handle of the author, when it could be resolved.
    pub slack_user_id: Option<String>,
}

impl CommitInfo {
    /// Abbreviated commit hash for display.
    pub fn short_commit(&self) -> &str {
        self.commit.get(..7).unwrap_or(&self.commit)
    }
}

/// Output of one orchestration pass.
#[derive(Default)]
pub struct CheckResults {
    /// Whether the branch should be locked.
    pub lock_branch: bool,
    /// Deferred change to the branch; `None` when nothing needs to change.
    pub action: Option<BranchAction>,
    /// Failing commits implicated in the lock, oldest `threshold` of the run.
    pub failed_commits: Vec<CommitInfo>,
}

impl fmt::Debug for CheckResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckResults")
            .field("lock_branch", &self.lock_branch)
            .field("action", &self.action.as_ref().map(BranchAction::description))
            .field("failed_commits", &self.failed_commits)
            .finish()
    }
}
