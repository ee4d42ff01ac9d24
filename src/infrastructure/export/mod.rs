//! File exports of build history.

pub mod csv;

pub use self::csv::{write_history_csv, CsvFiles};
