//! CI build model.
//!
//! Mirrors the subset of the Buildkite build JSON payload that the checker
//! reads. Every field is optional on the wire so that partially populated
//! builds (e.g. ones that have not started yet) still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a build as reported by the CI provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Passed,
    Failed,
    #[serde(rename = "canceled", alias = "cancelled")]
    Canceled,
    Canceling,
    Running,
    Scheduled,
    Blocked,
    Skipped,
    NotRun,
    Failing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::Running => "running",
            Self::Scheduled => "scheduled",
            Self::Blocked => "blocked",
            Self::Skipped => "skipped",
            Self::NotRun => "not_run",
            Self::Failing => "failing",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What triggered a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildSource {
    Webhook,
    Api,
    Ui,
    TriggerJob,
    /// Cron-style builds (nightly health checks and the like).
    #[serde(rename = "scheduled", alias = "schedule")]
    Scheduled,
    #[default]
    #[serde(other)]
    Other,
}

/// Commit author attached to a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Author {
    /// Renders as `Name (email)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}

/// A single job within a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub retries_count: u32,
}

/// One CI pipeline execution for a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub number: u64,

    #[serde(default)]
    pub commit: String,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub state: BuildState,

    #[serde(default)]
    pub source: BuildSource,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    /// Link to the build in the CI web UI
    #[serde(default, rename = "web_url")]
    pub url: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Build {
    /// Create a build with the given number and state, created now.
    pub fn new(number: u64, state: BuildState) -> Self {
        Self {
            number,
            state,
            created_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = commit.into();
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_source(mut self, source: BuildSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_jobs(mut self, jobs: Vec<Job>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Whether any job in this build had to be retried.
    pub fn has_retried_jobs(&self) -> bool {
        self.jobs.iter().any(|job| job.retries_count > 0)
    }

    /// Treat a build whose jobs were retried as failed.
    ///
    /// A retried job means the first attempt failed, so for history purposes
    /// the build counts as a flake even if it eventually went green.
    #[must_use]
    pub fn with_retries_as_failures(mut self) -> Self {
        if self.has_retried_jobs() {
            self.state = BuildState::Failed;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_buildkite_payload() {
        let json = r#"{
            "number": 42,
            "commit": "0123456789abcdef",
            "author": {"name": "Jane Doe", "email": "jane@example.com"},
            "state": "failed",
            "source": "webhook",
            "created_at": "2022-01-10T12:00:00Z",
            "finished_at": "2022-01-10T12:30:00Z",
            "web_url": "https://buildkite.com/org/pipeline/builds/42",
            "branch": "main",
            "jobs": [{"name": "test", "state": "failed", "retries_count": 1}]
        }"#;

        let build: Build = serde_json::from_str(json).unwrap();
        assert_eq!(build.number, 42);
        assert_eq!(build.state, BuildState::Failed);
        assert_eq!(build.source, BuildSource::Webhook);
        assert_eq!(build.author.unwrap().email, "jane@example.com");
        assert!(build.finished_at.is_some());
        assert_eq!(build.jobs.len(), 1);
    }

    #[test]
    fn test_deserialize_sparse_payload() {
        let build: Build = serde_json::from_str(r#"{"number": 7}"#).unwrap();
        assert_eq!(build.state, BuildState::Unknown);
        assert_eq!(build.source, BuildSource::Other);
        assert!(build.created_at.is_none());
        assert!(build.author.is_none());
    }

    #[test]
    fn test_state_and_source_aliases() {
        let build: Build =
            serde_json::from_str(r#"{"state": "cancelled", "source": "schedule"}"#).unwrap();
        assert_eq!(build.state, BuildState::Canceled);
        assert_eq!(build.source, BuildSource::Scheduled);

        let build: Build =
            serde_json::from_str(r#"{"state": "waiting_failed", "source": "scheduled"}"#).unwrap();
        assert_eq!(build.state, BuildState::Unknown);
        assert_eq!(build.source, BuildSource::Scheduled);
    }

    #[test]
    fn test_retried_jobs_reclassify_build() {
        let retried = Build::new(1, BuildState::Passed).with_jobs(vec![Job {
            name: Some("integration".to_string()),
            state: Some("passed".to_string()),
            retries_count: 2,
        }]);
        assert_eq!(retried.with_retries_as_failures().state, BuildState::Failed);

        let clean = Build::new(2, BuildState::Passed).with_jobs(vec![Job::default()]);
        assert_eq!(clean.with_retries_as_failures().state, BuildState::Passed);
    }

    #[test]
    fn test_author_display() {
        assert_eq!(
            Author::new("Jane Doe", "jane@example.com").to_string(),
            "Jane Doe (jane@example.com)"
        );
    }
}
