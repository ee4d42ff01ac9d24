//! Consecutive-failure detection over a newest-first build list.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::models::{Build, CommitInfo};
use crate::services::build_classifier::{is_failed_at, is_passed, is_scheduled};

/// Result of scanning a build list for a run of failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Every failing build in the run, newest first.
    pub failed_commits: Vec<CommitInfo>,
    /// Whether the run reached the threshold.
    pub threshold_exceeded: bool,
    /// Index the scan stopped at: the position of the terminating passed
    /// build, or the input length when the input ran out first.
    pub builds_scanned: usize,
}

/// Collect the run of consecutive failures at the head of `builds`.
///
/// Scheduled builds and builds that are neither passed nor failed are
/// skipped. The first passed build ends the run. The whole run is collected
/// even after the threshold is reached.
pub fn find_consecutive_failures(
    builds: &[Build],
    threshold: usize,
    timeout: Duration,
) -> ScanOutcome {
    find_consecutive_failures_at(builds, threshold, timeout, Utc::now())
}

/// [`find_consecutive_failures`] evaluated against a fixed clock.
pub fn find_consecutive_failures_at(
    builds: &[Build],
    threshold: usize,
    timeout: Duration,
    now: DateTime<Utc>,
) -> ScanOutcome {
    debug!(builds = builds.len(), threshold, "scanning for consecutive failures");

    let mut outcome = ScanOutcome {
        builds_scanned: builds.len(),
        ..Default::default()
    };
    let mut consecutive_failures = 0;

    for (index, build) in builds.iter().enumerate() {
        if is_scheduled(build) {
            continue;
        }
        if is_passed(build) {
            outcome.builds_scanned = index;
            return outcome;
        }
        // Still running and not timed out: inconclusive, keep looking.
        if !is_failed_at(build, timeout, now) {
            continue;
        }

        consecutive_failures += 1;
        outcome.failed_commits.push(commit_info(build));
        if consecutive_failures >= threshold {
            outcome.threshold_exceeded = true;
        }
    }

    outcome
}

fn commit_info(build: &Build) -> CommitInfo {
    CommitInfo {
        commit: build.commit.clone(),
        author: build
            .author
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        build_number: build.number,
        build_url: build.url.clone().unwrap_or_default(),
        build_created: build.created_at,
        slack_user_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Author, BuildSource, BuildState};
    use proptest::prelude::*;

    fn failed(number: u64) -> Build {
        Build::new(number, BuildState::Failed).with_commit(format!("commit-{number}"))
    }

    fn passed(number: u64) -> Build {
        Build::new(number, BuildState::Passed)
    }

    fn timeout() -> Duration {
        Duration::minutes(60)
    }

    #[test]
    fn test_empty_input() {
        let outcome = find_consecutive_failures(&[], 3, timeout());
        assert!(outcome.failed_commits.is_empty());
        assert!(!outcome.threshold_exceeded);
        assert_eq!(outcome.builds_scanned, 0);
    }

    #[test]
    fn test_stops_at_first_passed_build() {
        let builds = vec![failed(5), failed(4), passed(3), failed(2), failed(1)];
        let outcome = find_consecutive_failures(&builds, 2, timeout());

        let numbers: Vec<u64> = outcome.failed_commits.iter().map(|c| c.build_number).collect();
        assert_eq!(numbers, vec![5, 4]);
        assert!(outcome.threshold_exceeded);
        assert_eq!(outcome.builds_scanned, 2);
    }

    #[test]
    fn test_collects_whole_run_past_threshold() {
        let builds = vec![failed(4), failed(3), failed(2), failed(1)];
        let outcome = find_consecutive_failures(&builds, 2, timeout());
        assert_eq!(outcome.failed_commits.len(), 4);
        assert!(outcome.threshold_exceeded);
        assert_eq!(outcome.builds_scanned, 4);
    }

    #[test]
    fn test_below_threshold() {
        let builds = vec![failed(3), passed(2)];
        let outcome = find_consecutive_failures(&builds, 2, timeout());
        assert_eq!(outcome.failed_commits.len(), 1);
        assert!(!outcome.threshold_exceeded);
    }

    #[test]
    fn test_scheduled_builds_are_transparent() {
        let builds = vec![
            failed(5),
            passed(4).with_source(BuildSource::Scheduled),
            failed(3).with_source(BuildSource::Scheduled),
            failed(2),
        ];
        let outcome = find_consecutive_failures(&builds, 2, timeout());
        let numbers: Vec<u64> = outcome.failed_commits.iter().map(|c| c.build_number).collect();
        assert_eq!(numbers, vec![5, 2]);
        assert!(outcome.threshold_exceeded);
    }

    #[test]
    fn test_running_builds_are_skipped() {
        let builds = vec![Build::new(3, BuildState::Running), failed(2), failed(1)];
        let outcome = find_consecutive_failures(&builds, 2, timeout());
        assert_eq!(outcome.failed_commits.len(), 2);
        assert!(outcome.threshold_exceeded);
    }

    #[test]
    fn test_timed_out_build_counts_as_failure() {
        let now = Utc::now();
        let builds = vec![
            Build::new(3, BuildState::Running).with_created_at(now - Duration::minutes(90)),
            failed(2),
        ];
        let outcome = find_consecutive_failures_at(&builds, 2, timeout(), now);
        assert_eq!(outcome.failed_commits[0].build_number, 3);
        assert!(outcome.threshold_exceeded);
    }

    #[test]
    fn test_commit_info_fields() {
        let created = Utc::now();
        let build = failed(9)
            .with_author(Author::new("Jane Doe", "jane@example.com"))
            .with_url("https://buildkite.com/org/pipe/builds/9")
            .with_created_at(created);
        let outcome = find_consecutive_failures(&[build], 1, timeout());

        let info = &outcome.failed_commits[0];
        assert_eq!(info.commit, "commit-9");
        assert_eq!(info.author, "Jane Doe (jane@example.com)");
        assert_eq!(info.build_url, "https://buildkite.com/org/pipe/builds/9");
        assert_eq!(info.build_created, Some(created));
        assert!(info.slack_user_id.is_none());
    }

    #[test]
    fn test_missing_author_is_empty() {
        let outcome = find_consecutive_failures(&[failed(1)], 1, timeout());
        assert_eq!(outcome.failed_commits[0].author, "");
    }

    fn arb_build() -> impl Strategy<Value = Build> {
        (
            1u64..1000,
            prop_oneof![
                Just(BuildState::Passed),
                Just(BuildState::Failed),
                Just(BuildState::Canceled),
                Just(BuildState::Running),
            ],
            any::<bool>(),
        )
            .prop_map(|(number, state, scheduled)| {
                let build = Build::new(number, state);
                if scheduled {
                    build.with_source(BuildSource::Scheduled)
                } else {
                    build
                }
            })
    }

    proptest! {
        #[test]
        fn prop_only_scheduled_builds_yield_nothing(
            states in prop::collection::vec(
                prop_oneof![Just(BuildState::Passed), Just(BuildState::Failed)],
                0..20,
            ),
            threshold in 1usize..5,
        ) {
            let builds: Vec<Build> = states
                .into_iter()
                .enumerate()
                .map(|(i, state)| Build::new(i as u64, state).with_source(BuildSource::Scheduled))
                .collect();
            let outcome = find_consecutive_failures(&builds, threshold, timeout());
            prop_assert!(outcome.failed_commits.is_empty());
            prop_assert!(!outcome.threshold_exceeded);
        }

        #[test]
        fn prop_newest_passed_yields_no_failures(
            rest in prop::collection::vec(arb_build(), 0..20),
            threshold in 1usize..5,
        ) {
            let mut builds = vec![passed(0)];
            builds.extend(rest);
            let outcome = find_consecutive_failures(&builds, threshold, timeout());
            prop_assert!(outcome.failed_commits.is_empty());
            prop_assert_eq!(outcome.builds_scanned, 0);
        }

        #[test]
        fn prop_exceeded_iff_run_reaches_threshold(
            builds in prop::collection::vec(arb_build(), 0..30),
            threshold in 1usize..6,
        ) {
            let outcome = find_consecutive_failures(&builds, threshold, timeout());
            prop_assert_eq!(outcome.threshold_exceeded, outcome.failed_commits.len() >= threshold);
            prop_assert!(outcome.builds_scanned <= builds.len());
        }
    }
}
