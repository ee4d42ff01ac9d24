pub mod build;
pub mod check;
pub mod config;
pub mod history;

pub use build::{Author, Build, BuildSource, BuildState, Job};
pub use check::{CheckOptions, CheckResults, CommitInfo};
pub use config::{
    BuildkiteConfig, CheckConfig, Config, GitHubConfig, HoneycombConfig, LoggingConfig,
    SlackConfig,
};
pub use history::{DailyCounts, DailyHealth, DailyRecord, HistoryMaps, HistoryReport, HistorySummary};
