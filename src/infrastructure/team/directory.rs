//! YAML team directory.
//!
//! ```yaml
//! - name: Jane Doe
//!   email: jane@example.com
//!   github: janedoe
//!   slack_id: U012ABCDEF
//! ```

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CommitInfo;
use crate::domain::ports::{Teammate, TeammateResolver};

/// Teammates loaded from a YAML file.
///
/// Commit authors are formatted as `Name (email)`. Lookups try the email
/// first, then the name, both case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teammates: Vec<Teammate>,
}

impl TeamDirectory {
    pub fn new(teammates: Vec<Teammate>) -> Self {
        Self { teammates }
    }

    pub fn from_yaml(contents: &str) -> DomainResult<Self> {
        let teammates: Vec<Teammate> = serde_yaml::from_str(contents)?;
        Ok(Self::new(teammates))
    }

    pub async fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let directory = Self::from_yaml(&contents)?;
        debug!(path = %path.display(), teammates = directory.len(), "loaded team directory");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.teammates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teammates.is_empty()
    }

    fn find(&self, author: &str) -> Option<&Teammate> {
        let (name, email) = split_author(author);

        if let Some(email) = email {
            let found = self
                .teammates
                .iter()
                .find(|t| !t.email.is_empty() && t.email.eq_ignore_ascii_case(email));
            if found.is_some() {
                return found;
            }
        }

        self.teammates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Split `Name (email)` into its parts. Authors without a trailing
/// parenthesized email are returned whole as the name.
fn split_author(author: &str) -> (&str, Option<&str>) {
    let author = author.trim();
    if let Some(stripped) = author.strip_suffix(')') {
        if let Some(open) = stripped.rfind(" (") {
            let email = &stripped[open + 2..];
            if email.contains('@') {
                return (stripped[..open].trim(), Some(email.trim()));
            }
        }
    }
    (author, None)
}

#[async_trait]
impl TeammateResolver for TeamDirectory {
    async fn resolve_by_commit_author(&self, commit: &CommitInfo) -> DomainResult<Teammate> {
        self.find(&commit.author)
            .cloned()
            .ok_or_else(|| DomainError::TeammateNotFound(commit.author.clone()))
    }
}
