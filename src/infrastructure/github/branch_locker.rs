//! Branch locking through GitHub push restrictions.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::CommitInfo;
use crate::domain::ports::{BranchAction, BranchLocker};

use super::client::GitHubClient;
use super::models::{PushRestrictions, UpdateBranchProtection};

/// Locks a branch by restricting who may push to it.
///
/// A branch counts as locked while its protection carries a `restrictions`
/// rule. Locking keeps the existing protection rules and only adds the
/// restrictions; unlocking deletes just the restrictions.
#[derive(Debug, Clone)]
pub struct GitHubBranchLocker {
    client: Arc<GitHubClient>,
    owner: String,
    repo: String,
    branch: String,
}

impl GitHubBranchLocker {
    pub fn new(
        client: Arc<GitHubClient>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// Logins of commit authors who are active members of the owning org.
    ///
    /// Lookups that fail are logged and skipped; the fallback team can
    /// still push either way.
    async fn allowed_logins(&self, commits: &[CommitInfo]) -> Vec<String> {
        let mut logins = Vec::new();
        for commit in commits {
            let login = match self
                .client
                .commit_author_login(&self.owner, &self.repo, &commit.commit)
                .await
            {
                Ok(Some(login)) => login,
                Ok(None) => {
                    debug!(commit = %commit.commit, "commit has no linked GitHub account");
                    continue;
                }
                Err(e) => {
                    warn!(commit = %commit.commit, error = %e, "failed to look up commit author");
                    continue;
                }
            };

            if logins.contains(&login) {
                continue;
            }

            match self.client.is_active_member(&self.owner, &login).await {
                Ok(true) => logins.push(login),
                Ok(false) => debug!(login = %login, "commit author is not an active member"),
                Err(e) => warn!(login = %login, error = %e, "failed to check membership"),
            }
        }
        logins
    }
}

#[async_trait]
impl BranchLocker for GitHubBranchLocker {
    #[instrument(skip(self), fields(branch = %self.branch))]
    async fn unlock(&self) -> DomainResult<Option<BranchAction>> {
        let protection = self
            .client
            .get_branch_protection(&self.owner, &self.repo, &self.branch)
            .await?;

        if !protection.is_some_and(|p| p.is_locked()) {
            debug!("branch is not locked");
            return Ok(None);
        }

        let client = Arc::clone(&self.client);
        let (owner, repo, branch) = (self.owner.clone(), self.repo.clone(), self.branch.clone());
        Ok(Some(BranchAction::new(
            format!("unlock {}", self.branch),
            move || async move {
                client.delete_push_restrictions(&owner, &repo, &branch).await?;
                info!(branch = %branch, "removed push restrictions");
                Ok(())
            },
        )))
    }

    #[instrument(skip(self, commits), fields(branch = %self.branch, commits = commits.len()))]
    async fn lock(
        &self,
        commits: &[CommitInfo],
        fallback_team: &str,
    ) -> DomainResult<Option<BranchAction>> {
        let protection = self
            .client
            .get_branch_protection(&self.owner, &self.repo, &self.branch)
            .await?
            .unwrap_or_default();

        if protection.is_locked() {
            debug!("branch is already locked");
            return Ok(None);
        }

        let users = self.allowed_logins(commits).await;
        let update = UpdateBranchProtection::preserving(
            &protection,
            PushRestrictions {
                users,
                teams: vec![fallback_team.to_string()],
            },
        );

        let client = Arc::clone(&self.client);
        let (owner, repo, branch) = (self.owner.clone(), self.repo.clone(), self.branch.clone());
        Ok(Some(BranchAction::new(
            format!("lock {}", self.branch),
            move || async move {
                client
                    .update_branch_protection(&owner, &repo, &branch, &update)
                    .await?;
                info!(
                    branch = %branch,
                    users = ?update.restrictions.as_ref().map(|r| &r.users),
                    "restricted pushes"
                );
                Ok(())
            },
        )))
    }
}
