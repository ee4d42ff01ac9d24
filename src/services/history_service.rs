//! Build history aggregation.
//!
//! Walks a newest-first build list run by run, classifying each failing
//! build either as a flake (its run stayed under the threshold) or as part of
//! an incident (its run reached the threshold). Incidents are measured in
//! minutes of red time.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::models::{
    Build, CheckOptions, DailyCounts, DailyHealth, DailyRecord, HistoryMaps, HistoryReport,
};
use crate::services::build_classifier::{is_failed_at, is_passed, is_scheduled};
use crate::services::failure_scanner::find_consecutive_failures_at;

/// Aggregate `builds` (newest first) into daily totals, flakes and incidents.
///
/// An incident runs from the creation of its oldest failed build until the
/// fixing build finished (or was created, when it has no finish time).
///
/// `window_start` is the instant the backwards scan starts from, i.e. the
/// newest edge of the window. It closes any incident that has no passed build
/// after it yet. It also serves as the clock for timeout inference.
pub fn generate_history(
    builds: &[Build],
    window_start: DateTime<Utc>,
    opts: &CheckOptions,
) -> HistoryMaps {
    let mut maps = HistoryMaps::default();

    for build in builds {
        if let Some(created_at) = build.created_at {
            *maps.totals.entry(created_at.date_naive()).or_default() += 1;
        }
    }

    let mut last_passed: Option<DateTime<Utc>> = None;
    let mut cursor = 0;
    while cursor < builds.len() {
        let remaining = &builds[cursor..];
        let Some(first_failed) = remaining
            .iter()
            .position(|b| is_failed_at(b, opts.build_timeout, window_start))
        else {
            break;
        };

        // The passed build closest to this run is the one that ended it.
        // Scheduled builds never end a run.
        if let Some(fix) = remaining[..first_failed]
            .iter()
            .rev()
            .find(|b| is_passed(b) && !is_scheduled(b))
        {
            last_passed = fix.finished_at.or(fix.created_at).or(last_passed);
        }

        let outcome = find_consecutive_failures_at(
            &remaining[first_failed..],
            opts.failures_threshold,
            opts.build_timeout,
            window_start,
        );

        if outcome.threshold_exceeded {
            let started = outcome
                .failed_commits
                .last()
                .and_then(|oldest| oldest.build_created);
            if let Some(started) = started {
                let ended = last_passed.unwrap_or(window_start);
                let minutes = (ended - started).num_minutes().max(0);
                debug!(%started, %ended, minutes, "incident");
                *maps.incidents.entry(started.date_naive()).or_default() += minutes;
            }
        } else {
            for commit in &outcome.failed_commits {
                if let Some(created) = commit.build_created {
                    *maps.flakes.entry(created.date_naive()).or_default() += 1;
                }
            }
        }

        cursor += first_failed + outcome.builds_scanned.max(1);
    }

    maps
}

/// Expand a sparse per-day map into contiguous, ascending records.
///
/// Days between the first and last key that have no entry get a zero count.
pub fn map_to_records(counts: &DailyCounts) -> Vec<DailyRecord> {
    let (Some(first), Some(last)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    days_between(*first, *last)
        .map(|date| DailyRecord {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Align all three metrics on a shared, gap-free day range.
pub fn build_report(maps: &HistoryMaps) -> HistoryReport {
    let dates: BTreeSet<NaiveDate> = maps
        .totals
        .keys()
        .chain(maps.flakes.keys())
        .chain(maps.incidents.keys())
        .copied()
        .collect();

    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return HistoryReport::default();
    };

    let days = days_between(*first, *last)
        .map(|date| DailyHealth {
            date,
            total_builds: maps.totals.get(&date).copied().unwrap_or(0),
            flakes: maps.flakes.get(&date).copied().unwrap_or(0),
            incident_minutes: maps.incidents.get(&date).copied().unwrap_or(0),
        })
        .collect();

    HistoryReport { days }
}

fn days_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(first), move |date| {
        date.checked_add_days(Days::new(1)).filter(|next| *next <= last)
    })
}
