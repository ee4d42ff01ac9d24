//! Service layer: build classification, failure scanning, check orchestration
//! and history aggregation.

pub mod build_classifier;
pub mod check_service;
pub mod failure_scanner;
pub mod history_service;
pub mod report;

pub use build_classifier::{is_failed, is_failed_at, is_passed, is_scheduled};
pub use check_service::CheckService;
pub use failure_scanner::{find_consecutive_failures, find_consecutive_failures_at, ScanOutcome};
pub use history_service::{build_report, generate_history, map_to_records};
