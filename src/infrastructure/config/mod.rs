//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Per-subcommand credential checks

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
