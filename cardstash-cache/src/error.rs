//! Error types for the artifact cache.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur in cache operations.
///
/// Read-side failures never surface here: the regeneration check treats them
/// as a cache miss instead.
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The generator could not be started, exited unsuccessfully, reported
    /// `ERROR:` or printed something other than the expected marker line.
    #[error("generator error: {0}")]
    Generator(String),
}
