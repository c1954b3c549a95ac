//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Remote failures are deliberately absent: the mirror reports them as
/// [`MirrorRead::Unavailable`](crate::MirrorRead::Unavailable) and callers
/// fall back to the local snapshot.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local snapshot store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot encoding error.
    #[error(transparent)]
    Types(#[from] cardstash_types::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No Tokio runtime was available to spawn background work.
    #[error("no async runtime: {0}")]
    Runtime(String),
}
