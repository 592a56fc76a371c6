//! Centralized error types for LiveSync.

use livesync_store::StoreError;
use thiserror::Error;

/// Main error type for LiveSync operations.
#[derive(Error, Debug)]
pub enum LiveSyncError {
    #[error("Item not found")]
    ItemNotFound(String),

    #[error("Class not found")]
    ClassNotFound(String),

    #[error("Course not found")]
    CourseNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for LiveSync operations.
pub type LiveSyncResult<T> = Result<T, LiveSyncError>;

impl LiveSyncError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error names a record that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound(_) | Self::ClassNotFound(_) | Self::CourseNotFound(_)
        )
    }
}
