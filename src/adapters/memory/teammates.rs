//! In-memory teammate resolver.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CommitInfo;
use crate::domain::ports::{Teammate, TeammateResolver};

/// Resolves commit authors against a fixed list of teammates.
///
/// Matches on email when the author string is `Name (email)`, otherwise on
/// the full author string against the teammate name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeammateResolver {
    teammates: Vec<Teammate>,
}

impl InMemoryTeammateResolver {
    pub fn new(teammates: Vec<Teammate>) -> Self {
        Self { teammates }
    }
}

#[async_trait]
impl TeammateResolver for InMemoryTeammateResolver {
    async fn resolve_by_commit_author(&self, commit: &CommitInfo) -> DomainResult<Teammate> {
        self.teammates
            .iter()
            .find(|t| {
                commit.author == t.name
                    || (!t.email.is_empty() && commit.author.contains(&format!("({})", t.email)))
            })
            .cloned()
            .ok_or_else(|| DomainError::TeammateNotFound(commit.author.clone()))
    }
}
