//! Buildkite REST API client.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Build, BuildkiteConfig};
use crate::domain::ports::{BuildQuery, BuildSource};

/// Builds requested per page.
const PER_PAGE: u32 = 100;

/// Upper bound on pages fetched for a single window.
const MAX_PAGES: u32 = 1_000;

/// HTTP client for the Buildkite REST API v2.
///
/// Lists builds of one pipeline, newest first.
#[derive(Debug, Clone)]
pub struct BuildkiteClient {
    http: Client,
    token: String,
    base_url: String,
    organization: String,
    pipeline: String,
}

impl BuildkiteClient {
    pub fn new(config: &BuildkiteConfig) -> Self {
        Self {
            http: Client::new(),
            token: config.token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization: config.organization.clone(),
            pipeline: config.pipeline.clone(),
        }
    }

    fn builds_url(&self) -> String {
        format!(
            "{}/v2/organizations/{}/pipelines/{}/builds",
            self.base_url, self.organization, self.pipeline
        )
    }

    /// Fetch one page of builds.
    #[instrument(skip(self, query), fields(branch = %query.branch))]
    pub async fn list_page(&self, query: &BuildQuery, page: u32) -> DomainResult<Vec<Build>> {
        let url = self.builds_url();
        let mut params: Vec<(&str, String)> = vec![
            ("branch", query.branch.clone()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
            ("include_retried_jobs", "true".to_string()),
        ];
        if let Some(from) = query.created_from {
            params.push(("created_from", timestamp(from)));
        }
        if let Some(to) = query.created_to {
            params.push(("created_to", timestamp(to)));
        }

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("User-Agent", "buildchecker")
            .query(&params)
            .send()
            .await
            .map_err(|e| DomainError::BuildSource(format!("Buildkite request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Http {
                endpoint: url,
                status,
                body,
            });
        }

        let builds = resp
            .json::<Vec<Build>>()
            .await
            .map_err(|e| DomainError::BuildSource(format!("Buildkite response parse failed: {e}")))?;

        debug!(page, count = builds.len(), "fetched builds page");
        Ok(builds)
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl BuildSource for BuildkiteClient {
    async fn list_builds(&self, query: &BuildQuery) -> DomainResult<Vec<Build>> {
        if !query.all_pages {
            return self.list_page(query, 1).await;
        }

        let mut builds = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch = self.list_page(query, page).await?;
            if batch.is_empty() {
                break;
            }
            builds.extend(batch);
        }
        Ok(builds)
    }
}
