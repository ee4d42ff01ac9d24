//! Adapters that implement the domain ports without external systems.

pub mod memory;
