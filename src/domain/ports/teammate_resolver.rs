use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::models::CommitInfo;

/// A member of the organization as known to the team directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teammate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// GitHub login
    #[serde(default)]
    pub github: Option<String>,
    /// Slack member ID, used for `<@ID>` mentions
    #[serde(default)]
    pub slack_id: Option<String>,
}

/// Port for mapping a commit author to a teammate.
#[async_trait]
pub trait TeammateResolver: Send + Sync {
    /// Resolve the author of a failing commit.
    ///
    /// Returns [`DomainError::TeammateNotFound`](crate::domain::DomainError::TeammateNotFound)
    /// when nobody matches.
    async fn resolve_by_commit_author(&self, commit: &CommitInfo) -> DomainResult<Teammate>;
}
