//! GitHub branch protection.
//!
//! - [`GitHubClient`]: typed REST calls used by the locker
//! - [`GitHubBranchLocker`]: [`BranchLocker`](crate::domain::ports::BranchLocker)
//!   backed by the branch protection `restrictions` rule

pub mod branch_locker;
pub mod client;
pub mod models;

pub use branch_locker::GitHubBranchLocker;
pub use client::GitHubClient;
