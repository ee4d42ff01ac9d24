//! Domain layer for buildchecker
//!
//! This module contains the build model, the check/history value objects,
//! and the port traits that external collaborators implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult};
