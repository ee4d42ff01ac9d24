//! Daily aggregates produced by the history command.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-day counters keyed by the UTC date a build was created.
pub type DailyCounts = BTreeMap<NaiveDate, i64>;

/// Raw aggregation output, one sparse map per metric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryMaps {
    /// Builds created per day.
    pub totals: DailyCounts,
    /// Failing builds that did not belong to an incident, per day.
    pub flakes: DailyCounts,
    /// Minutes of red time per day, attributed to the day an incident started.
    pub incidents: DailyCounts,
}

/// One day of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub count: i64,
}

/// One day across all metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHealth {
    pub date: NaiveDate,
    pub total_builds: i64,
    pub flakes: i64,
    pub incident_minutes: i64,
}

/// Contiguous day-by-day view of a build history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub days: Vec<DailyHealth>,
}

/// Totals across a whole report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub days: usize,
    pub total_builds: i64,
    pub flakes: i64,
    pub incident_minutes: i64,
}

impl HistorySummary {
    pub fn average_builds_per_day(&self) -> f64 {
        per_day(self.total_builds, self.days)
    }

    pub fn average_flakes_per_day(&self) -> f64 {
        per_day(self.flakes, self.days)
    }

    pub fn average_incident_minutes_per_day(&self) -> f64 {
        per_day(self.incident_minutes, self.days)
    }

    /// Share of builds that flaked, as a percentage.
    pub fn flake_rate(&self) -> f64 {
        if self.total_builds == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.flakes as f64 / self.total_builds as f64 * 100.0;
        rate
    }
}

#[allow(clippy::cast_precision_loss)]
fn per_day(value: i64, days: usize) -> f64 {
    if days == 0 {
        0.0
    } else {
        value as f64 / days as f64
    }
}

impl HistoryReport {
    pub fn summary(&self) -> HistorySummary {
        self.days.iter().fold(
            HistorySummary {
                days: self.days.len(),
                ..Default::default()
            },
            |mut acc, day| {
                acc.total_builds += day.total_builds;
                acc.flakes += day.flakes;
                acc.incident_minutes += day.incident_minutes;
                acc
            },
        )
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }
}
