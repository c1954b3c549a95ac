//! Showcase profiles produced by the profile fetcher.
//!
//! The fetcher prints `SUCCESS:<json>` where the payload carries the player
//! summary and the characters currently on display. This module turns that
//! payload into [`Entity`] values the cache can fingerprint.

use crate::{Cosmetics, Entity, EntityId, Equipment, Progression, SubAttribute};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Player summary attached to a showcase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerInfo {
    pub uid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEquipment {
    id: String,
    #[serde(default)]
    level: u32,
    #[serde(default = "default_refinement")]
    rank: u32,
}

fn default_refinement() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct RawCharacter {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    rank: u32,
    #[serde(default)]
    promotion: u32,
    #[serde(default, alias = "w_engine", alias = "light_cone", alias = "weapon")]
    equipment: Option<RawEquipment>,
    #[serde(default)]
    stats: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RawCharacter {
    fn into_entity(self) -> Option<Entity> {
        if self.error.is_some() {
            return None;
        }
        let id = EntityId::parse(self.id).ok()?;
        let sub_attributes = self
            .stats
            .into_iter()
            .filter_map(|(type_id, value)| {
                stat_value(&value).map(|v| SubAttribute::new(type_id, v, 0))
            })
            .collect();

        Some(Entity {
            id,
            name: self.name,
            progression: Progression {
                level: self.level,
                ascension: self.promotion,
                rank: self.rank,
            },
            equipment: self
                .equipment
                .map(|e| Equipment::new(e.id, e.level, e.rank)),
            sub_attributes,
            cosmetics: Cosmetics {
                icon_url: self.icon,
                ..Cosmetics::default()
            },
        })
    }
}

/// Accepts plain numbers and numeric strings such as `"12.5%"`.
fn stat_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

/// A fetched player showcase.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowcaseProfile {
    pub player: PlayerInfo,
    #[serde(default)]
    characters: Vec<RawCharacter>,
    /// Seconds the upstream API asks callers to cache this response.
    #[serde(default)]
    pub ttl: u64,
}

impl ShowcaseProfile {
    /// Parses the JSON payload of a `SUCCESS:` line.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::InvalidProfile(e.to_string()))
    }

    /// Number of characters in the payload, including ones that failed to
    /// serialize upstream.
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Converts the showcase into entities.
    ///
    /// Characters the fetcher marked with an `error`, or whose id is not a
    /// valid entity id, are skipped.
    pub fn entities(&self) -> Vec<Entity> {
        self.characters
            .iter()
            .cloned()
            .filter_map(RawCharacter::into_entity)
            .collect()
    }
}
