//! Shared test helpers for cache tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cardstash_cache::{
    ArtifactGenerator, CacheConfig, CacheError, CacheResult, CacheStore, GenerationReport,
    GenerationRequest, GenerationTarget,
};
use cardstash_types::{Entity, EntityId, Equipment, OwnerId, SubAttribute};
use std::sync::Mutex;
use tempfile::TempDir;

pub fn owner(id: &str) -> OwnerId {
    OwnerId::parse(id).unwrap()
}

pub fn entity_id(id: &str) -> EntityId {
    EntityId::parse(id).unwrap()
}

/// A level-80 character with a light cone and two sub-attributes.
pub fn character(id: &str, name: &str) -> Entity {
    Entity::new(entity_id(id), name)
        .with_progression(80, 6, 0)
        .with_equipment(Equipment::new("23004", 80, 1))
        .with_sub_attribute(SubAttribute::new("CRIT_RATE", 32.4, 3))
        .with_sub_attribute(SubAttribute::new("SPD", 12.0, 1))
}

pub fn temp_store() -> (TempDir, CacheStore) {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(CacheConfig {
        root: dir.path().join("cards"),
        ..Default::default()
    });
    (dir, store)
}

/// Writes a placeholder artifact file for an entity.
pub fn write_artifact(store: &CacheStore, owner: &OwnerId, entity: &EntityId) {
    let path = store.artifact_path(owner, entity);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"\x89PNG").unwrap();
}

/// Generator double that writes one placeholder file per requested entity.
#[derive(Default)]
pub struct FakeGenerator {
    pub fail_with: Option<String>,
    pub requests: Mutex<Vec<(OwnerId, GenerationTarget, usize)>>,
}

impl FakeGenerator {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> CacheResult<GenerationReport> {
        self.requests.lock().unwrap().push((
            request.owner.clone(),
            request.target.clone(),
            request.entities.len(),
        ));

        if let Some(message) = &self.fail_with {
            return Err(CacheError::Generator(message.clone()));
        }

        let ids: Vec<EntityId> = match &request.target {
            GenerationTarget::All => request.entities.iter().map(|e| e.id.clone()).collect(),
            GenerationTarget::Single(id) => vec![id.clone()],
        };
        for id in &ids {
            std::fs::write(request.output_dir.join(format!("{id}.png")), b"\x89PNG").unwrap();
        }
        Ok(GenerationReport {
            payload: format!("{} cards", ids.len()),
        })
    }
}
