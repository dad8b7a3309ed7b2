//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Snapshot persistence (could swap a JSON file -> browser storage or a database)
//! - Clock (for testing)

mod error;
mod storage;
mod testing;

pub use error::StoreError;
pub use storage::SnapshotStore;
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use storage::MockSnapshotStore;

#[cfg(test)]
pub use testing::MockClockPort;
