//! Build list persisted as JSON.
//!
//! `history --write-to` saves what was fetched so later runs can replay the
//! same window with `--load-from` without hitting the API.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Build;
use crate::domain::ports::{BuildQuery, BuildSource};

#[derive(Debug, Clone)]
pub struct BuildCache {
    path: PathBuf,
}

impl BuildCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> DomainResult<Vec<Build>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let builds: Vec<Build> = serde_json::from_str(&contents).map_err(|e| {
            DomainError::Serialization(format!(
                "invalid build cache {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), count = builds.len(), "loaded build cache");
        Ok(builds)
    }

    pub async fn save(&self, builds: &[Build]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(builds)?;
        tokio::fs::write(&self.path, contents).await?;
        info!(path = %self.path.display(), count = builds.len(), "wrote build cache");
        Ok(())
    }
}

/// A cache file answers every query with its full contents; the window it
/// was fetched for is fixed at write time.
#[async_trait]
impl BuildSource for BuildCache {
    async fn list_builds(&self, _query: &BuildQuery) -> DomainResult<Vec<Build>> {
        self.load().await
    }
}
