//! Infrastructure layer
//!
//! Concrete implementations of the domain ports against external systems,
//! plus process-level concerns (configuration, logging).

pub mod buildkite;
pub mod config;
pub mod export;
pub mod github;
pub mod honeycomb;
pub mod logging;
pub mod slack;
pub mod team;
