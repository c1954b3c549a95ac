//! The regeneration pass: check, clear, generate, record.

use crate::error::{CacheError, CacheResult};
use crate::generator::{ArtifactGenerator, GenerationReport, GenerationRequest, GenerationTarget};
use crate::store::CacheStore;
use cardstash_types::{Entity, EntityId, OwnerId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Result of [`Refresher::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Every artifact was already current; nothing ran.
    Fresh,
    /// The generator re-rendered the owner's artifacts.
    Regenerated {
        /// Number of entities recorded in the new manifest.
        count: usize,
        /// The generator's success payload.
        payload: String,
    },
}

/// Drives a [`CacheStore`] and an [`ArtifactGenerator`] together.
pub struct Refresher {
    store: CacheStore,
    generator: Arc<dyn ArtifactGenerator>,
}

impl Refresher {
    pub fn new(store: CacheStore, generator: Arc<dyn ArtifactGenerator>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Regenerates the owner's artifacts if any entity is stale.
    pub async fn refresh(&self, owner: &OwnerId, entities: &[Entity]) -> CacheResult<RefreshOutcome> {
        if !self.store.any_needs_regeneration(owner, entities).await {
            info!(owner = %owner, "Artifacts are current");
            return Ok(RefreshOutcome::Fresh);
        }
        self.regenerate(owner, entities).await
    }

    /// Unconditionally clears and re-renders every artifact of the owner.
    ///
    /// The manifest is replaced only after the generator reports success for
    /// the whole batch. On failure it is left as it was, so the entities keep
    /// reporting as stale.
    pub async fn regenerate(&self, owner: &OwnerId, entities: &[Entity]) -> CacheResult<RefreshOutcome> {
        let removed = self.store.clear_artifacts(owner).await?;
        let output_dir = self.store.owner_dir(owner);
        fs::create_dir_all(&output_dir).await?;

        info!(owner = %owner, removed, entities = entities.len(), "Regenerating artifacts");

        let GenerationReport { payload } = self
            .generator
            .generate(GenerationRequest {
                owner: owner.clone(),
                output_dir,
                entities: entities.to_vec(),
                target: GenerationTarget::All,
            })
            .await?;

        for entity in entities {
            let path = self.store.artifact_path(owner, &entity.id);
            if !fs::try_exists(&path).await.unwrap_or(false) {
                warn!(owner = %owner, entity = %entity.id, "Generator reported success but artifact is missing");
            }
        }

        self.store.update_manifest(owner, entities).await;
        Ok(RefreshOutcome::Regenerated {
            count: entities.len(),
            payload,
        })
    }

    /// Renders one entity's artifact on demand.
    ///
    /// Other artifacts and the manifest are left untouched; the next
    /// [`refresh`](Self::refresh) still decides from the recorded
    /// fingerprints.
    pub async fn render_single(
        &self,
        owner: &OwnerId,
        entities: &[Entity],
        entity_id: &EntityId,
    ) -> CacheResult<PathBuf> {
        if !entities.iter().any(|e| &e.id == entity_id) {
            return Err(CacheError::Generator(format!(
                "entity {entity_id} is not in the owner's entity list"
            )));
        }
        let output_dir = self.store.owner_dir(owner);
        fs::create_dir_all(&output_dir).await?;

        self.generator
            .generate(GenerationRequest {
                owner: owner.clone(),
                output_dir,
                entities: entities.to_vec(),
                target: GenerationTarget::Single(entity_id.clone()),
            })
            .await?;

        Ok(self.store.artifact_path(owner, entity_id))
    }
}
