use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

use crate::domain::errors::DomainResult;
use crate::domain::models::CommitInfo;

/// A deferred change to a branch's push restrictions.
///
/// Lockers compute what needs to change up front and hand back an action so
/// the caller decides when (or whether) to apply it. A locker that finds the
/// branch already in the requested state returns `None` instead.
pub struct BranchAction {
    description: String,
    run: Box<dyn FnOnce() -> BoxFuture<'static, DomainResult<()>> + Send>,
}

impl BranchAction {
    pub fn new<F, Fut>(description: impl Into<String>, run: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = DomainResult<()>> + Send + 'static,
    {
        Self {
            description: description.into(),
            run: Box::new(move || Box::pin(run())),
        }
    }

    /// Human readable summary, e.g. `lock main`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply the change. Consumes the action; it can only run once.
    pub async fn apply(self) -> DomainResult<()> {
        (self.run)().await
    }
}

impl fmt::Debug for BranchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchAction")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Port for applying and removing push restrictions on a branch.
///
/// Both operations are idempotent: when the branch is already in the
/// requested state they return `Ok(None)`.
#[async_trait]
pub trait BranchLocker: Send + Sync {
    /// Prepare removal of push restrictions.
    async fn unlock(&self) -> DomainResult<Option<BranchAction>>;

    /// Prepare push restrictions that only let the authors of `commits`
    /// (when they are organization members) and `fallback_team` push.
    async fn lock(
        &self,
        commits: &[CommitInfo],
        fallback_team: &str,
    ) -> DomainResult<Option<BranchAction>>;
}
