//! Build classification predicates.

use chrono::{DateTime, Duration, Utc};

use crate::domain::models::{Build, BuildSource, BuildState};

/// Cron-triggered builds never count towards or against a failure run.
pub fn is_scheduled(build: &Build) -> bool {
    build.source == BuildSource::Scheduled
}

pub fn is_passed(build: &Build) -> bool {
    build.state == BuildState::Passed
}

/// Whether a build failed, inferring failure for builds stuck past `timeout`.
pub fn is_failed(build: &Build, timeout: Duration) -> bool {
    is_failed_at(build, timeout, Utc::now())
}

/// [`is_failed`] evaluated against a fixed clock.
pub fn is_failed_at(build: &Build, timeout: Duration, now: DateTime<Utc>) -> bool {
    if matches!(build.state, BuildState::Failed | BuildState::Canceled) {
        return true;
    }

    if timeout > Duration::zero() && build.finished_at.is_none() {
        if let Some(created_at) = build.created_at {
            return now - created_at > timeout;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled() {
        let scheduled = Build::new(1, BuildState::Passed).with_source(BuildSource::Scheduled);
        let webhook = Build::new(2, BuildState::Passed).with_source(BuildSource::Webhook);
        assert!(is_scheduled(&scheduled));
        assert!(!is_scheduled(&webhook));
    }

    #[test]
    fn test_terminal_states() {
        let timeout = Duration::minutes(60);
        assert!(is_passed(&Build::new(1, BuildState::Passed)));
        assert!(!is_passed(&Build::new(1, BuildState::Failed)));
        assert!(is_failed(&Build::new(1, BuildState::Failed), timeout));
        assert!(is_failed(&Build::new(1, BuildState::Canceled), timeout));
        assert!(!is_failed(&Build::new(1, BuildState::Passed), timeout));
    }

    #[test]
    fn test_running_build_within_timeout_is_not_failed() {
        let build = Build::new(1, BuildState::Running);
        assert!(!is_failed(&build, Duration::minutes(60)));
    }

    #[test]
    fn test_running_build_past_timeout_is_failed() {
        let now = Utc::now();
        let build =
            Build::new(1, BuildState::Running).with_created_at(now - Duration::minutes(61));
        assert!(is_failed_at(&build, Duration::minutes(60), now));
    }

    #[test]
    fn test_zero_timeout_disables_inference() {
        let now = Utc::now();
        let build = Build::new(1, BuildState::Running).with_created_at(now - Duration::days(3));
        assert!(!is_failed_at(&build, Duration::zero(), now));
    }

    #[test]
    fn test_finished_build_is_never_timed_out() {
        let now = Utc::now();
        let build = Build::new(1, BuildState::Blocked)
            .with_created_at(now - Duration::hours(5))
            .with_finished_at(now - Duration::hours(4));
        assert!(!is_failed_at(&build, Duration::minutes(60), now));
    }

    #[test]
    fn test_build_without_created_at_is_not_timed_out() {
        let mut build = Build::new(1, BuildState::Running);
        build.created_at = None;
        assert!(!is_failed(&build, Duration::minutes(1)));
    }
}
