//! Honeycomb batch events API client.

use chrono::{NaiveTime, TimeZone, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DailyHealth, HistoryReport};

/// One entry of a `/1/batch/{dataset}` request body.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvent {
    /// RFC 3339 timestamp, midnight UTC of the day
    pub time: String,
    pub data: DailyHealth,
}

impl From<&DailyHealth> for BatchEvent {
    fn from(day: &DailyHealth) -> Self {
        let midnight = Utc.from_utc_datetime(&day.date.and_time(NaiveTime::MIN));
        Self {
            time: midnight.to_rfc3339(),
            data: *day,
        }
    }
}

/// Sends one event per report day to a Honeycomb dataset.
#[derive(Debug, Clone)]
pub struct HoneycombClient {
    http: Client,
    token: String,
    base_url: String,
}

impl HoneycombClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self, report), fields(days = report.days.len()))]
    pub async fn send_report(&self, dataset: &str, report: &HistoryReport) -> DomainResult<()> {
        if report.days.is_empty() {
            return Ok(());
        }

        let url = format!("{}/1/batch/{}", self.base_url, dataset);
        let events: Vec<BatchEvent> = report.days.iter().map(BatchEvent::from).collect();

        let resp = self
            .http
            .post(&url)
            .header("X-Honeycomb-Team", &self.token)
            .header("User-Agent", "buildchecker")
            .json(&events)
            .send()
            .await
            .map_err(|e| DomainError::Export(format!("Honeycomb request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Http {
                endpoint: url,
                status,
                body,
            });
        }

        info!(dataset, events = events.len(), "sent history to Honeycomb");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_batch_event_shape() {
        let day = DailyHealth {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_builds: 12,
            flakes: 2,
            incident_minutes: 45,
        };
        let value = serde_json::to_value(BatchEvent::from(&day)).unwrap();
        assert_eq!(value["time"], "2024-03-01T00:00:00+00:00");
        assert_eq!(value["data"]["date"], "2024-03-01");
        assert_eq!(value["data"]["total_builds"], 12);
        assert_eq!(value["data"]["flakes"], 2);
        assert_eq!(value["data"]["incident_minutes"], 45);
    }
}
