//! Slack incoming-webhook notifications.

pub mod webhook;

pub use webhook::SlackWebhookNotifier;
