//! Core type definitions for cardstash.
//!
//! This crate defines the data model shared by the artifact cache and the
//! snapshot reconciliation layer:
//! - Owner and entity identifiers (validated, path-safe strings)
//! - Tracked entities with progression, equipment and sub-attributes
//! - Per-owner cache manifests
//! - The category → owner → external id snapshot mirrored to a remote store
//! - Parsing of showcase profiles emitted by the profile fetcher

mod entity;
mod ids;
mod manifest;
pub mod profile;
mod snapshot;

pub use entity::{Cosmetics, Entity, Equipment, Progression, SubAttribute};
pub use ids::{EntityId, OwnerId};
pub use manifest::{Manifest, ManifestEntry};
pub use snapshot::Snapshot;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("reserved category name: {0:?}")]
    ReservedCategory(String),
}
