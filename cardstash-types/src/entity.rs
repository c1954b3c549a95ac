//! Tracked entities.
//!
//! An entity splits into the attributes that change what a rendered card
//! looks like (progression, equipment, sub-attributes) and cosmetic data that
//! is only carried along for display.

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// A tracked entity, e.g. one character in a player's showcase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity identity.
    pub id: EntityId,
    /// Display name. Used as the manifest label, never fingerprinted.
    pub name: String,
    /// Level, ascension tier and upgrade-rank count.
    #[serde(default)]
    pub progression: Progression,
    /// Equipped item, if any.
    #[serde(default)]
    pub equipment: Option<Equipment>,
    /// Sub-attribute collection. Order carries no meaning.
    #[serde(default)]
    pub sub_attributes: Vec<SubAttribute>,
    /// Icons, splash art and alternate names.
    #[serde(default)]
    pub cosmetics: Cosmetics,
}

impl Entity {
    /// Creates an entity with default progression and no equipment.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            progression: Progression::default(),
            equipment: None,
            sub_attributes: Vec::new(),
            cosmetics: Cosmetics::default(),
        }
    }

    /// Sets the progression attributes.
    #[must_use]
    pub fn with_progression(mut self, level: u32, ascension: u32, rank: u32) -> Self {
        self.progression = Progression {
            level,
            ascension,
            rank,
        };
        self
    }

    /// Sets the equipped item.
    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        self
    }

    /// Appends a sub-attribute.
    #[must_use]
    pub fn with_sub_attribute(mut self, sub_attribute: SubAttribute) -> Self {
        self.sub_attributes.push(sub_attribute);
        self
    }
}

/// Progression attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub ascension: u32,
    /// Upgrade-rank count (eidolons, mindscapes, constellations).
    pub rank: u32,
}

/// The equipped item and its upgrade state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub level: u32,
    pub refinement: u32,
}

impl Equipment {
    pub fn new(id: impl Into<String>, level: u32, refinement: u32) -> Self {
        Self {
            id: id.into(),
            level,
            refinement,
        }
    }
}

/// A single sub-attribute (stat roll).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAttribute {
    pub type_id: String,
    pub value: f64,
    #[serde(default)]
    pub enhancements: u32,
}

impl SubAttribute {
    pub fn new(type_id: impl Into<String>, value: f64, enhancements: u32) -> Self {
        Self {
            type_id: type_id.into(),
            value,
            enhancements,
        }
    }
}

/// Display-only data. Changing any of it never invalidates a cached artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetics {
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub splash_url: Option<String>,
    #[serde(default)]
    pub alt_names: Vec<String>,
}
