//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - BranchLocker: push restrictions on the monitored branch
//! - TeammateResolver: commit author to teammate lookups
//! - BuildSource: CI build listings
//! - Notifier: human-facing announcements
//!
//! The check and history services only depend on these traits, so the real
//! HTTP-backed collaborators and the in-memory ones are interchangeable.

pub mod branch_locker;
pub mod build_source;
pub mod notifier;
pub mod teammate_resolver;

pub use branch_locker::{BranchAction, BranchLocker};
pub use build_source::{BuildQuery, BuildSource};
pub use notifier::Notifier;
pub use teammate_resolver::{Teammate, TeammateResolver};
