//! On-disk artifact cache.
//!
//! Layout, one directory per owner:
//!
//! ```text
//! <root>/<owner>/manifest.json
//! <root>/<owner>/<entity>.<ext>
//! ```
//!
//! The manifest records the fingerprint each artifact was rendered from. A
//! cache hit needs both the artifact file and a matching fingerprint.

use crate::error::{CacheError, CacheResult};
use crate::fingerprint::fingerprint;
use cardstash_types::{Entity, EntityId, Manifest, ManifestEntry, OwnerId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Name of the per-owner manifest document.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Configuration for the artifact cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one subdirectory per owner.
    pub root: PathBuf,
    /// File extension of generated artifacts (without the dot).
    pub artifact_extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("cache/cards"),
            artifact_extension: "png".to_string(),
        }
    }
}

/// Owns the per-owner manifests and artifact files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    config: CacheConfig,
}

impl CacheStore {
    /// Creates a cache store. Nothing is touched on disk until the first
    /// manifest write.
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Directory holding an owner's manifest and artifacts.
    pub fn owner_dir(&self, owner: &OwnerId) -> PathBuf {
        self.config.root.join(owner.as_str())
    }

    /// Path of an owner's manifest.
    pub fn manifest_path(&self, owner: &OwnerId) -> PathBuf {
        self.owner_dir(owner).join(MANIFEST_FILE)
    }

    /// Path of the artifact for one entity.
    pub fn artifact_path(&self, owner: &OwnerId, entity_id: &EntityId) -> PathBuf {
        self.owner_dir(owner)
            .join(format!("{}.{}", entity_id, self.config.artifact_extension))
    }

    /// Loads an owner's manifest. Returns `None` if it was never written.
    pub async fn load_manifest(&self, owner: &OwnerId) -> CacheResult<Option<Manifest>> {
        let bytes = match fs::read(self.manifest_path(owner)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Loads the manifest for a regeneration check. Any failure is treated
    /// as "no manifest" so callers regenerate rather than serve stale cards.
    async fn manifest_for_check(&self, owner: &OwnerId) -> Option<Manifest> {
        match self.load_manifest(owner).await {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(owner = %owner, error = %e, "Unreadable manifest, forcing regeneration");
                None
            }
        }
    }

    async fn is_stale(&self, owner: &OwnerId, entity: &Entity, manifest: Option<&Manifest>) -> bool {
        let artifact = self.artifact_path(owner, &entity.id);
        match fs::try_exists(&artifact).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(owner = %owner, entity = %entity.id, "Artifact missing");
                return true;
            }
            Err(e) => {
                warn!(path = %artifact.display(), error = %e, "Failed to stat artifact");
                return true;
            }
        }

        let Some(stored) = manifest.and_then(|m| m.fingerprint(&entity.id)) else {
            debug!(owner = %owner, entity = %entity.id, "No manifest entry");
            return true;
        };

        let current = fingerprint(entity);
        if stored != current {
            debug!(owner = %owner, entity = %entity.id, "Fingerprint changed");
            return true;
        }
        false
    }

    /// Whether the artifact for `entity` must be (re)generated.
    ///
    /// True when the artifact file is absent, the manifest has no entry for
    /// the entity, or the stored fingerprint differs from the current one.
    /// Read errors count as true.
    pub async fn needs_regeneration(&self, owner: &OwnerId, entity: &Entity) -> bool {
        let manifest = self.manifest_for_check(owner).await;
        self.is_stale(owner, entity, manifest.as_ref()).await
    }

    /// Whether any of `entities` needs regeneration.
    pub async fn any_needs_regeneration(&self, owner: &OwnerId, entities: &[Entity]) -> bool {
        let manifest = self.manifest_for_check(owner).await;
        for entity in entities {
            if self.is_stale(owner, entity, manifest.as_ref()).await {
                return true;
            }
        }
        false
    }

    /// Ids of the entities that need regeneration, in input order.
    pub async fn stale_entities(&self, owner: &OwnerId, entities: &[Entity]) -> Vec<EntityId> {
        let manifest = self.manifest_for_check(owner).await;
        let mut stale = Vec::new();
        for entity in entities {
            if self.is_stale(owner, entity, manifest.as_ref()).await {
                stale.push(entity.id.clone());
            }
        }
        stale
    }

    /// Deletes every artifact file of an owner. The manifest is left in
    /// place; it gets overwritten once regeneration succeeds.
    ///
    /// Returns the number of files removed. A missing owner directory is not
    /// an error.
    pub async fn clear_artifacts(&self, owner: &OwnerId) -> CacheResult<usize> {
        let dir = self.owner_dir(owner);
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let mut removed = 0;
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            let is_artifact = path
                .extension()
                .is_some_and(|ext| ext == self.config.artifact_extension.as_str())
                && path.file_name().is_some_and(|name| name != MANIFEST_FILE);
            if !is_artifact || !entry.file_type().await?.is_file() {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove artifact"),
            }
        }

        debug!(owner = %owner, removed, "Cleared artifacts");
        Ok(removed)
    }

    /// Replaces the owner's manifest with fresh entries for exactly
    /// `entities`.
    ///
    /// Write failures are logged and swallowed: the next check simply
    /// reports the entities as stale again. Returns whether the manifest was
    /// persisted.
    pub async fn update_manifest(&self, owner: &OwnerId, entities: &[Entity]) -> bool {
        let now = Utc::now();
        let manifest: Manifest = entities
            .iter()
            .map(|entity| {
                (
                    entity.id.clone(),
                    ManifestEntry {
                        fingerprint: fingerprint(entity),
                        label: entity.name.clone(),
                        updated_at: now,
                    },
                )
            })
            .collect();

        match self.write_manifest(owner, &manifest).await {
            Ok(()) => {
                info!(owner = %owner, entries = manifest.len(), "Manifest updated");
                true
            }
            Err(e) => {
                warn!(owner = %owner, error = %e, "Failed to write manifest");
                false
            }
        }
    }

    async fn write_manifest(&self, owner: &OwnerId, manifest: &Manifest) -> CacheResult<()> {
        let dir = self.owner_dir(owner);
        fs::create_dir_all(&dir).await?;

        let json = serde_json::to_vec_pretty(manifest)?;
        let tmp = dir.join(format!("{MANIFEST_FILE}.tmp"));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, self.manifest_path(owner)).await?;
        Ok(())
    }
}
