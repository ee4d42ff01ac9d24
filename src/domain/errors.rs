//! Domain errors for buildchecker.

use thiserror::Error;

/// Domain-level errors raised at the external-collaborator boundary.
///
/// The scanning and orchestration logic itself is infallible; every variant
/// here originates from a port implementation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Branch protection error: {0}")]
    BranchProtection(String),

    #[error("Teammate not found for commit author: {0}")]
    TeammateNotFound(String),

    #[error("Build source error: {0}")]
    BuildSource(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
