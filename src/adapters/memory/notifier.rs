//! In-memory notifier.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::ports::Notifier;

/// Records messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    messages: Arc<RwLock<Vec<String>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn post(&self, markdown: &str) -> DomainResult<()> {
        info!(message = %markdown, "notification (not sent)");
        self.messages.write().await.push(markdown.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages() {
        let notifier = InMemoryNotifier::new();
        notifier.post("first").await.unwrap();
        notifier.post("second").await.unwrap();
        assert_eq!(notifier.messages().await, vec!["first", "second"]);
    }
}
