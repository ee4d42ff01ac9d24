//! Buildkite build listings.
//!
//! - [`BuildkiteClient`]: REST API v2 client
//! - [`BuildCache`]: JSON file of previously fetched builds

pub mod cache;
pub mod client;

pub use cache::BuildCache;
pub use client::BuildkiteClient;
