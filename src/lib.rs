//! buildchecker - CI build health monitor
//!
//! buildchecker watches the CI builds of a branch. When the most recent
//! builds fail several times in a row it locks the branch so that only the
//! authors of the failing commits (and a fallback team) can push a fix, and
//! it unlocks the branch again once a build passes. It can also aggregate a
//! window of build history into daily totals, flakes and minutes spent red.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Build models, errors and port traits
//! - **Service Layer** (`services`): Failure scanning, check orchestration, history aggregation
//! - **Adapters** (`adapters`): In-memory port implementations for dry runs and tests
//! - **Infrastructure Layer** (`infrastructure`): Buildkite, GitHub, Slack, Honeycomb, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use buildchecker::adapters::memory::{InMemoryBranchLocker, InMemoryTeammateResolver};
//! use buildchecker::services::CheckService;
//!
//! let service = CheckService::new(
//!     Arc::new(InMemoryBranchLocker::new("main")),
//!     Arc::new(InMemoryTeammateResolver::default()),
//!     "dev-experience",
//! );
//! let results = service.check_builds(&builds, &CheckOptions::default()).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Build, BuildState, CheckOptions, CheckResults, CommitInfo, Config};
pub use domain::ports::{BranchAction, BranchLocker, BuildSource, Notifier, TeammateResolver};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{generate_history, map_to_records, CheckService};
