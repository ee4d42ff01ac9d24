//! Posts markdown messages to Slack incoming webhooks.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::Notifier;
use crate::infrastructure::logging::SecretScrubber;

/// Sends every message to each configured webhook.
///
/// Delivery is best effort per webhook: a failure is logged with the
/// webhook URL scrubbed, and `post` only errors when no webhook accepted
/// the message.
#[derive(Debug, Clone)]
pub struct SlackWebhookNotifier {
    http: Client,
    webhooks: Vec<String>,
    scrubber: SecretScrubber,
}

impl SlackWebhookNotifier {
    pub fn new(webhooks: Vec<String>) -> Self {
        Self {
            http: Client::new(),
            webhooks,
            scrubber: SecretScrubber::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.webhooks.is_empty()
    }

    /// Slack block kit payload with a single mrkdwn section.
    pub fn payload(markdown: &str) -> Value {
        json!({
            "blocks": [{
                "type": "section",
                "text": { "type": "mrkdwn", "text": markdown },
            }]
        })
    }

    async fn send(&self, webhook: &str, payload: &Value) -> DomainResult<()> {
        let resp = self
            .http
            .post(webhook)
            .json(payload)
            .send()
            .await
            .map_err(|e| DomainError::Notification(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Http {
                endpoint: self.scrubber.scrub_message(webhook),
                status,
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackWebhookNotifier {
    async fn post(&self, markdown: &str) -> DomainResult<()> {
        if self.webhooks.is_empty() {
            debug!("no Slack webhooks configured, skipping notification");
            return Ok(());
        }

        let payload = Self::payload(markdown);
        let results = join_all(self.webhooks.iter().map(|w| self.send(w, &payload))).await;

        let mut failures = 0;
        for (webhook, result) in self.webhooks.iter().zip(&results) {
            if let Err(e) = result {
                failures += 1;
                warn!(
                    webhook = %self.scrubber.scrub_message(webhook),
                    error = %self.scrubber.scrub_message(&e.to_string()),
                    "failed to post Slack message"
                );
            }
        }

        if failures == self.webhooks.len() {
            return Err(DomainError::Notification(format!(
                "all {failures} Slack webhooks failed"
            )));
        }
        debug!(delivered = self.webhooks.len() - failures, "posted Slack message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = SlackWebhookNotifier::payload("*main* is locked");
        assert_eq!(payload["blocks"][0]["type"], "section");
        assert_eq!(payload["blocks"][0]["text"]["type"], "mrkdwn");
        assert_eq!(payload["blocks"][0]["text"]["text"], "*main* is locked");
    }

    #[tokio::test]
    async fn test_no_webhooks_is_noop() {
        let notifier = SlackWebhookNotifier::new(Vec::new());
        assert!(notifier.is_empty());
        notifier.post("hello").await.unwrap();
    }
}
