//! End-to-end check pass: Buildkite builds in, GitHub protection and Slack out.

mod common;

use std::sync::Arc;

use buildchecker::cli::commands::check::{run_check, CheckContext};
use buildchecker::domain::models::Config;
use buildchecker::domain::ports::Teammate;
use buildchecker::infrastructure::buildkite::BuildkiteClient;
use buildchecker::infrastructure::github::{GitHubBranchLocker, GitHubClient};
use buildchecker::infrastructure::slack::SlackWebhookNotifier;
use buildchecker::infrastructure::team::TeamDirectory;
use chrono::{Duration, Utc};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const BUILDS_PATH: &str = "/v2/organizations/sourcegraph/pipelines/sourcegraph/builds";
const PROTECTION_PATH: &str = "/repos/sourcegraph/sourcegraph/branches/main/protection";

fn config(server: &ServerGuard, threshold: usize) -> Config {
    let mut config = Config::default();
    config.buildkite.token = "bk".to_string();
    config.buildkite.base_url = server.url();
    config.github.token = "gh".to_string();
    config.github.base_url = server.url();
    config.slack.webhooks = vec![format!("{}/slack", server.url())];
    config.check.failures_threshold = threshold;
    config
}

fn context(config: &Config) -> CheckContext {
    let github = Arc::new(GitHubClient::from_config(&config.github));
    CheckContext {
        builds: Arc::new(BuildkiteClient::new(&config.buildkite)),
        locker: Arc::new(GitHubBranchLocker::new(
            github,
            config.github.owner.clone(),
            config.github.repo.clone(),
            config.check.branch.clone(),
        )),
        teammates: Arc::new(TeamDirectory::new(vec![Teammate {
            name: "Dev 2".to_string(),
            email: "dev2@example.com".to_string(),
            github: Some("dev2".to_string()),
            slack_id: Some("U0DEV2".to_string()),
        }])),
        notifier: Arc::new(SlackWebhookNotifier::new(config.slack.webhooks.clone())),
        dry_run: false,
    }
}

#[tokio::test]
async fn test_red_branch_gets_locked_and_announced() {
    let mut server = Server::new_async().await;
    let now = Utc::now();

    let _builds = server
        .mock("GET", BUILDS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                common::buildkite_build_json(3, "failed", now - Duration::minutes(20)),
                common::buildkite_build_json(2, "failed", now - Duration::minutes(40)),
                common::buildkite_build_json(1, "passed", now - Duration::minutes(60)),
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let _protection = server
        .mock("GET", PROTECTION_PATH)
        .with_status(200)
        .with_body(common::protection_json(false).to_string())
        .create_async()
        .await;
    let _commits = server
        .mock("GET", Matcher::Regex(r"^/repos/sourcegraph/sourcegraph/commits/\d+$".to_string()))
        .with_status(200)
        .with_body(json!({ "author": null }).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", PROTECTION_PATH)
        .match_body(Matcher::PartialJson(json!({
            "restrictions": { "users": [], "teams": ["dev-experience"] }
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let slack = server
        .mock("POST", "/slack")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("has been locked".to_string()),
            Matcher::Regex("U0DEV2".to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = config(&server, 2);
    let out = run_check(&config, context(&config)).await.expect("check ran");

    assert!(out.lock_branch);
    assert!(out.applied);
    let numbers: Vec<u64> = out.failed_commits.iter().map(|c| c.build_number).collect();
    assert_eq!(numbers, vec![3, 2]);
    put.assert_async().await;
    slack.assert_async().await;
}

#[tokio::test]
async fn test_failed_unlock_is_announced_and_returned() {
    let mut server = Server::new_async().await;
    let now = Utc::now();

    let _builds = server
        .mock("GET", BUILDS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([common::buildkite_build_json(9, "passed", now - Duration::minutes(5))])
                .to_string(),
        )
        .create_async()
        .await;
    let _protection = server
        .mock("GET", PROTECTION_PATH)
        .with_status(200)
        .with_body(common::protection_json(true).to_string())
        .create_async()
        .await;
    let _delete = server
        .mock("DELETE", format!("{PROTECTION_PATH}/restrictions").as_str())
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let slack = server
        .mock("POST", "/slack")
        .match_body(Matcher::Regex("Failed to unlock main".to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = config(&server, 3);
    let err = run_check(&config, context(&config)).await.unwrap_err();

    assert!(format!("{err:#}").contains("Failed to unlock main"));
    slack.assert_async().await;
}
