//! GitHub HTTP client.
//!
//! Covers the REST API v3 calls needed to read and rewrite branch
//! protection, and to map commits to organization members.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GitHubConfig;

use super::models::{BranchProtection, CommitSummary, Membership, UpdateBranchProtection};

/// HTTP client for the GitHub REST API v3.
///
/// All methods return [`DomainResult`]; transport failures map to
/// [`DomainError::BranchProtection`] and unexpected statuses to
/// [`DomainError::Http`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GitHubConfig) -> Self {
        Self::new(config.token.clone(), config.base_url.clone())
    }

    /// Build an authorized request for an API path.
    fn request(&self, method: Method, path: &str) -> (String, RequestBuilder) {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .http
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "buildchecker");
        (url, builder)
    }

    async fn send(url: &str, builder: RequestBuilder) -> DomainResult<Response> {
        builder.send().await.map_err(|e| {
            DomainError::BranchProtection(format!("GitHub request to {url} failed: {e}"))
        })
    }

    async fn fail(url: String, resp: Response) -> DomainError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        DomainError::Http {
            endpoint: url,
            status,
            body,
        }
    }

    /// GET a JSON resource, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> DomainResult<Option<T>> {
        let (url, builder) = self.request(Method::GET, path);
        let resp = Self::send(&url, builder).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(url = %url, "GitHub resource not found");
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::fail(url, resp).await);
        }

        resp.json::<T>().await.map(Some).map_err(|e| {
            DomainError::BranchProtection(format!("GitHub response from {url} unreadable: {e}"))
        })
    }

    /// Current protection of a branch; `None` when the branch is unprotected.
    pub async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> DomainResult<Option<BranchProtection>> {
        self.get_optional(&format!("/repos/{owner}/{repo}/branches/{branch}/protection"))
            .await
    }

    pub async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        update: &UpdateBranchProtection,
    ) -> DomainResult<()> {
        let (url, builder) = self.request(
            Method::PUT,
            &format!("/repos/{owner}/{repo}/branches/{branch}/protection"),
        );
        let resp = Self::send(&url, builder.json(update)).await?;
        if !resp.status().is_success() {
            return Err(Self::fail(url, resp).await);
        }
        Ok(())
    }

    /// Remove push restrictions, keeping every other protection rule.
    pub async fn delete_push_restrictions(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> DomainResult<()> {
        let (url, builder) = self.request(
            Method::DELETE,
            &format!("/repos/{owner}/{repo}/branches/{branch}/protection/restrictions"),
        );
        let resp = Self::send(&url, builder).await?;
        if !resp.status().is_success() {
            return Err(Self::fail(url, resp).await);
        }
        Ok(())
    }

    /// GitHub login a commit is attributed to, if GitHub linked it to an account.
    pub async fn commit_author_login(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> DomainResult<Option<String>> {
        let commit: Option<CommitSummary> = self
            .get_optional(&format!("/repos/{owner}/{repo}/commits/{sha}"))
            .await?;
        Ok(commit.and_then(|c| c.author).map(|a| a.login))
    }

    /// Whether `login` is an active member of `org`.
    pub async fn is_active_member(&self, org: &str, login: &str) -> DomainResult<bool> {
        let membership: Option<Membership> = self
            .get_optional(&format!("/orgs/{org}/memberships/{login}"))
            .await?;
        Ok(membership.is_some_and(|m| m.is_active()))
    }
}
