//! Subcommand handlers.

pub mod check;
pub mod history;
