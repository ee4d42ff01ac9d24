//! Common test utilities for integration tests
//!
//! Shared build fixtures and Buildkite/GitHub JSON bodies.

#![allow(dead_code)]

use buildchecker::domain::models::{Author, Build, BuildState};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// A finished build created `minutes_ago` minutes before now.
pub fn build(number: u64, state: BuildState, minutes_ago: i64) -> Build {
    let created = Utc::now() - Duration::minutes(minutes_ago);
    Build::new(number, state)
        .with_commit(format!("{number:0>40}"))
        .with_author(Author::new(format!("Dev {number}"), format!("dev{number}@example.com")))
        .with_created_at(created)
        .with_finished_at(created + Duration::minutes(5))
        .with_url(format!("https://buildkite.com/sourcegraph/sourcegraph/builds/{number}"))
}

/// Buildkite REST representation of a build.
pub fn buildkite_build_json(number: u64, state: &str, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": format!("build-{number}"),
        "number": number,
        "state": state,
        "source": "webhook",
        "branch": "main",
        "commit": format!("{number:0>40}"),
        "message": "Some change",
        "author": { "name": format!("Dev {number}"), "email": format!("dev{number}@example.com") },
        "created_at": created_at.to_rfc3339(),
        "finished_at": (created_at + Duration::minutes(10)).to_rfc3339(),
        "web_url": format!("https://buildkite.com/sourcegraph/sourcegraph/builds/{number}"),
        "jobs": [{ "name": "test", "state": state, "retries_count": 0 }]
    })
}

/// Branch protection body as returned by GitHub, optionally with push restrictions.
pub fn protection_json(locked: bool) -> Value {
    let mut body = json!({
        "url": "https://api.github.com/repos/sourcegraph/sourcegraph/branches/main/protection",
        "required_status_checks": { "strict": false, "contexts": ["buildkite/sourcegraph"] },
        "enforce_admins": { "enabled": true },
        "required_linear_history": { "enabled": true },
        "allow_force_pushes": { "enabled": false },
        "allow_deletions": { "enabled": false }
    });
    if locked {
        body["restrictions"] = json!({
            "users": [{ "login": "dev1" }],
            "teams": [{ "slug": "dev-experience" }],
            "apps": []
        });
    }
    body
}
