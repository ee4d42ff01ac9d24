//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::{DailyHealth, HistorySummary};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if std::env::var_os("NO_COLOR").is_some() {
        table.force_no_tty();
    }
    table
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Per-day history table with a totals footer.
pub fn history_table(days: &[DailyHealth], summary: &HistorySummary) -> String {
    let mut table = base_table();
    table.set_header(header(&["Date", "Builds", "Flakes", "Red minutes"]));

    for day in days {
        table.add_row(vec![
            Cell::new(day.date.format("%Y-%m-%d").to_string()),
            number(day.total_builds),
            number(day.flakes),
            number(day.incident_minutes),
        ]);
    }

    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        number(summary.total_builds),
        number(summary.flakes),
        number(summary.incident_minutes),
    ]);

    table.to_string()
}

/// Failing commits implicated in a lock.
pub fn commits_table(rows: &[(u64, String, String)]) -> String {
    let mut table = base_table();
    table.set_header(header(&["Build", "Commit", "Author"]));
    for (build, commit, author) in rows {
        table.add_row(vec![
            number(build),
            Cell::new(commit),
            Cell::new(truncate(author, 48)),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer string", 10), "a much ...");
    }

    #[test]
    fn test_history_table_contents() {
        let days = vec![DailyHealth {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_builds: 7,
            flakes: 1,
            incident_minutes: 30,
        }];
        let summary = HistorySummary {
            days: 1,
            total_builds: 7,
            flakes: 1,
            incident_minutes: 30,
        };

        let rendered = history_table(&days, &summary);
        assert!(rendered.contains("2024-03-01"));
        assert!(rendered.contains("Red minutes"));
        assert!(rendered.contains("Total"));
    }
}
