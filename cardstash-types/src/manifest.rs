//! Per-owner cache manifest.

use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The last-known state of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Fingerprint of the entity the artifact was rendered from.
    pub fingerprint: String,
    /// Human-readable label (the entity's display name at render time).
    pub label: String,
    /// When the artifact was recorded.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Entity id → manifest entry, for a single owner.
///
/// Serialized as a flat JSON object keyed by entity id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<EntityId, ManifestEntry>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the entry for an entity.
    pub fn get(&self, entity_id: &EntityId) -> Option<&ManifestEntry> {
        self.entries.get(entity_id)
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, entity_id: EntityId, entry: ManifestEntry) {
        self.entries.insert(entity_id, entry);
    }

    /// Returns the stored fingerprint for an entity.
    pub fn fingerprint(&self, entity_id: &EntityId) -> Option<&str> {
        self.entries.get(entity_id).map(|e| e.fingerprint.as_str())
    }

    /// Iterates over all entries in entity id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &ManifestEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(EntityId, ManifestEntry)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (EntityId, ManifestEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
