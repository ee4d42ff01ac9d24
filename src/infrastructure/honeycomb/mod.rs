//! Honeycomb event export for build history.

pub mod client;

pub use client::HoneycombClient;
