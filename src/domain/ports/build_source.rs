use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::Build;

/// Filter for listing builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildQuery {
    pub branch: String,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// Fetch every page instead of only the most recent one
    pub all_pages: bool,
}

impl BuildQuery {
    /// Most recent page of builds for a branch.
    pub fn latest(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            created_from: None,
            created_to: None,
            all_pages: false,
        }
    }

    /// Every build for a branch created inside `[from, to]`.
    pub fn window(
        branch: impl Into<String>,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            branch: branch.into(),
            created_from,
            created_to,
            all_pages: true,
        }
    }
}

/// Port for retrieving builds, newest first.
#[async_trait]
pub trait BuildSource: Send + Sync {
    async fn list_builds(&self, query: &BuildQuery) -> DomainResult<Vec<Build>>;
}
