//! In-memory port implementations for dry runs and tests.

pub mod branch_locker;
pub mod notifier;
pub mod teammates;

pub use branch_locker::{InMemoryBranchLocker, LockState};
pub use notifier::InMemoryNotifier;
pub use teammates::InMemoryTeammateResolver;
