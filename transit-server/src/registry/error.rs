//! Stop snapshot error types.

/// Errors that can occur when writing the stop snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem operation failed
    #[error("snapshot I/O error: {message}")]
    Io { message: String },

    /// Failed to serialize the snapshot
    #[error("snapshot serialize error: {0}")]
    Json(#[from] serde_json::Error),
}
