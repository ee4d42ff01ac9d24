//! `date,count` CSV files, one per metric.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DailyCounts, DailyRecord, HistoryMaps};
use crate::services::map_to_records;

pub const TOTALS_FILE: &str = "totals.csv";
pub const FLAKES_FILE: &str = "flakes.csv";
pub const INCIDENTS_FILE: &str = "incidents.csv";

/// Paths written by [`write_history_csv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFiles {
    pub totals: PathBuf,
    pub flakes: PathBuf,
    pub incidents: PathBuf,
}

/// Render records as CSV with a `date,count` header.
pub fn render_records(records: &[DailyRecord]) -> String {
    std::iter::once("date,count\n".to_string())
        .chain(
            records
                .iter()
                .map(|r| format!("{},{}\n", r.date.format("%Y-%m-%d"), r.count)),
        )
        .collect()
}

async fn write_counts(path: &Path, counts: &DailyCounts) -> DomainResult<()> {
    let contents = render_records(&map_to_records(counts));
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| DomainError::Export(format!("failed to write {}: {e}", path.display())))
}

/// Write `totals.csv`, `flakes.csv` and `incidents.csv` into `dir`.
///
/// Each file covers its own metric's date range with missing days
/// filled in as zero.
pub async fn write_history_csv(dir: &Path, maps: &HistoryMaps) -> DomainResult<CsvFiles> {
    tokio::fs::create_dir_all(dir).await?;

    let files = CsvFiles {
        totals: dir.join(TOTALS_FILE),
        flakes: dir.join(FLAKES_FILE),
        incidents: dir.join(INCIDENTS_FILE),
    };
    write_counts(&files.totals, &maps.totals).await?;
    write_counts(&files.flakes, &maps.flakes).await?;
    write_counts(&files.incidents, &maps.incidents).await?;

    info!(dir = %dir.display(), "wrote history CSV files");
    Ok(files)
}
