use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Port for announcing check and history outcomes to humans.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a markdown message.
    async fn post(&self, markdown: &str) -> DomainResult<()>;
}
