//! Slack message text for check and history outcomes.

use std::fmt::Write;

use crate::domain::models::{CommitInfo, HistoryReport};

/// Announcement that `branch` has been locked because of `commits`.
///
/// `repo_url` is the web URL of the repository, used for commit links.
pub fn lock_message(branch: &str, repo_url: &str, commits: &[CommitInfo]) -> String {
    let mut message = format!(
        ":alert: *Consecutive build failures detected - the `{branch}` branch has been locked.* :alert:\n\
         The authors of the following failed commits who are teammates have been granted merge access \
         to investigate and resolve the issue:\n"
    );

    for commit in commits {
        let who = match (&commit.slack_user_id, commit.author.is_empty()) {
            (Some(slack_id), _) => format!("<@{slack_id}>"),
            (None, false) => commit.author.clone(),
            (None, true) => "unknown author".to_string(),
        };
        let _ = writeln!(
            message,
            "\n• <{repo_url}/commit/{}|{}> (<{}|build {}>): {who}",
            commit.commit,
            commit.short_commit(),
            commit.build_url,
            commit.build_number,
        );
    }

    let _ = write!(
        message,
        "\nThe branch will automatically be unlocked once a green build has run on `{branch}`."
    );
    message
}

pub fn unlock_message(branch: &str) -> String {
    format!(
        ":white_check_mark: The build has passed on the latest commit, and `{branch}` has been unlocked."
    )
}

/// Posted when applying a lock or unlock failed. `action` is the action's
/// description, e.g. `lock main`.
pub fn action_failed_message(action: &str, error: &str) -> String {
    format!(":warning: Failed to {action}: {error}")
}

/// Summary of a history window.
pub fn history_message(branch: &str, report: &HistoryReport) -> String {
    let summary = report.summary();
    let (Some(first), Some(last)) = (report.first_date(), report.last_date()) else {
        return format!(":bar_chart: *CI report for `{branch}`*: no builds in the selected window.");
    };

    format!(
        ":bar_chart: *CI report for `{branch}`* ({first} to {last}, {days} days)\n\
         • Builds: {builds} ({builds_avg:.1} per day)\n\
         • Flakes: {flakes} ({flake_rate:.1}% of builds, {flakes_avg:.1} per day)\n\
         • Time spent red: {hours}h{minutes:02}m ({red_avg:.0} minutes per day)",
        days = summary.days,
        builds = summary.total_builds,
        builds_avg = summary.average_builds_per_day(),
        flakes = summary.flakes,
        flake_rate = summary.flake_rate(),
        flakes_avg = summary.average_flakes_per_day(),
        hours = summary.incident_minutes / 60,
        minutes = summary.incident_minutes % 60,
        red_avg = summary.average_incident_minutes_per_day(),
    )
}
