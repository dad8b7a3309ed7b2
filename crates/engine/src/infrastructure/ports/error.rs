//! Error types for port operations.

use essencecalc_shared::SnapshotError;

/// Snapshot store errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// File system operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored content exists but is not a valid snapshot.
    #[error("Stored snapshot is invalid: {0}")]
    InvalidSnapshot(String),
}

impl StoreError {
    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Check if the stored content itself was rejected.
    pub fn is_invalid_snapshot(&self) -> bool {
        matches!(self, Self::InvalidSnapshot(_))
    }
}

impl From<SnapshotError> for StoreError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::InvalidSnapshot(message) => Self::InvalidSnapshot(message),
            SnapshotError::Serialization(message) => Self::Serialization(message),
        }
    }
}
