//! GitHub REST API payloads for branch protection.
//!
//! GitHub returns protection rules in a different shape than it accepts them
//! (`{"enabled": true}` objects on read, plain booleans on write), so reads and
//! writes have separate types.

use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}/branches/{branch}/protection`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub required_status_checks: Option<StatusChecks>,
    #[serde(default)]
    pub enforce_admins: Option<EnabledFlag>,
    #[serde(default)]
    pub required_pull_request_reviews: Option<PullRequestReviews>,
    /// Present only when pushes are restricted, i.e. the branch is locked.
    #[serde(default)]
    pub restrictions: Option<Restrictions>,
    #[serde(default)]
    pub required_linear_history: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_force_pushes: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_deletions: Option<EnabledFlag>,
    #[serde(default)]
    pub required_conversation_resolution: Option<EnabledFlag>,
}

impl BranchProtection {
    pub fn is_locked(&self) -> bool {
        self.restrictions.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledFlag {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChecks {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviews {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub required_approving_review_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default)]
    pub teams: Vec<TeamRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub slug: String,
}

/// `PUT /repos/{owner}/{repo}/branches/{branch}/protection`
///
/// The first four fields are required by the API and are sent as `null`
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBranchProtection {
    pub required_status_checks: Option<StatusChecks>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: Option<PullRequestReviews>,
    pub restrictions: Option<PushRestrictions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,
}

impl UpdateBranchProtection {
    /// Keep every rule of `current` and replace the push restrictions.
    pub fn preserving(current: &BranchProtection, restrictions: PushRestrictions) -> Self {
        let flag = |f: Option<EnabledFlag>| f.map(|f| f.enabled);
        Self {
            required_status_checks: current.required_status_checks.clone(),
            enforce_admins: flag(current.enforce_admins),
            required_pull_request_reviews: current.required_pull_request_reviews.clone(),
            restrictions: Some(restrictions),
            required_linear_history: flag(current.required_linear_history),
            allow_force_pushes: flag(current.allow_force_pushes),
            allow_deletions: flag(current.allow_deletions),
            required_conversation_resolution: flag(current.required_conversation_resolution),
        }
    }
}

/// Push restrictions as sent on write: logins and team slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRestrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
}

/// `GET /repos/{owner}/{repo}/commits/{sha}`, only the GitHub account the
/// commit is attributed to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitSummary {
    #[serde(default)]
    pub author: Option<UserRef>,
}

/// `GET /orgs/{org}/memberships/{username}`
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub state: String,
}

impl Membership {
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}
