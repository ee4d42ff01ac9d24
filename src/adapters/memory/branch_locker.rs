//! In-memory branch locker.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::CommitInfo;
use crate::domain::ports::{BranchAction, BranchLocker};

/// Push restrictions currently applied to the branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    pub locked: bool,
    /// Commit authors allowed to push while locked.
    pub allowed_authors: Vec<String>,
    /// Teams allowed to push while locked.
    pub allowed_teams: Vec<String>,
    /// Descriptions of every action applied so far.
    pub applied: Vec<String>,
}

/// Branch locker that keeps its state in memory.
///
/// Used by `check --dry-run` and by tests. Actions mutate the shared state
/// only when applied, so a prepared-but-dropped action changes nothing.
#[derive(Debug, Clone)]
pub struct InMemoryBranchLocker {
    branch: String,
    state: Arc<RwLock<LockState>>,
}

impl InMemoryBranchLocker {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            state: Arc::new(RwLock::new(LockState::default())),
        }
    }

    /// Start out with the branch already locked.
    pub fn locked(branch: impl Into<String>) -> Self {
        let locker = Self::new(branch);
        if let Ok(mut state) = locker.state.try_write() {
            state.locked = true;
        }
        locker
    }

    pub async fn state(&self) -> LockState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl BranchLocker for InMemoryBranchLocker {
    async fn unlock(&self) -> DomainResult<Option<BranchAction>> {
        if !self.state.read().await.locked {
            return Ok(None);
        }

        let state = Arc::clone(&self.state);
        let description = format!("unlock {}", self.branch);
        let applied = description.clone();
        Ok(Some(BranchAction::new(description, move || async move {
            let mut state = state.write().await;
            state.locked = false;
            state.allowed_authors.clear();
            state.allowed_teams.clear();
            state.applied.push(applied);
            Ok(())
        })))
    }

    async fn lock(
        &self,
        commits: &[CommitInfo],
        fallback_team: &str,
    ) -> DomainResult<Option<BranchAction>> {
        if self.state.read().await.locked {
            return Ok(None);
        }

        let mut authors: Vec<String> = commits
            .iter()
            .filter(|c| !c.author.is_empty())
            .map(|c| c.author.clone())
            .collect();
        authors.sort();
        authors.dedup();

        let team = fallback_team.to_string();
        let state = Arc::clone(&self.state);
        let description = format!("lock {}", self.branch);
        let applied = description.clone();
        Ok(Some(BranchAction::new(description, move || async move {
            let mut state = state.write().await;
            state.locked = true;
            state.allowed_authors = authors;
            state.allowed_teams = vec![team];
            state.applied.push(applied);
            Ok(())
        })))
    }
}
