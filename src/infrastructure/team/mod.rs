//! Team directory lookups.

pub mod directory;

pub use directory::TeamDirectory;
