//! The account-link snapshot mirrored between the local file and the remote
//! document.
//!
//! A snapshot maps `category → owner → external id` (e.g. `"hsr" → user →
//! game uid`). The `active` sentinel tells a legitimately empty snapshot apart
//! from one that was never initialized; only active snapshots are
//! authoritative.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key reserved for the sentinel in the JSON document.
const ACTIVE_KEY: &str = "active";

/// Full exported state of the owner → external id mapping store.
///
/// Equality is structural: two snapshots are equal when they hold the same
/// categories, bindings and sentinel, whatever order the JSON arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    categories: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    active: bool,
}

impl Snapshot {
    /// Creates an active snapshot with every category present and empty.
    pub fn empty<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(Into::into)
                .filter(|c| c != ACTIVE_KEY)
                .map(|c| (c, BTreeMap::new()))
                .collect(),
            active: true,
        }
    }

    /// Whether this snapshot has been initialized.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the sentinel.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns the external id bound to `owner` in `category`.
    pub fn get(&self, category: &str, owner: &str) -> Option<&str> {
        self.categories
            .get(category)
            .and_then(|m| m.get(owner))
            .map(String::as_str)
    }

    /// Binds `owner` to `external_id` in `category`, creating the category
    /// if needed. Returns the previous binding.
    ///
    /// The category name `active` is reserved; it fails with
    /// [`Error::ReservedCategory`](crate::Error::ReservedCategory) and leaves
    /// the snapshot unchanged.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        owner: impl Into<String>,
        external_id: impl Into<String>,
    ) -> crate::Result<Option<String>> {
        let category = category.into();
        if Self::is_reserved(&category) {
            return Err(crate::Error::ReservedCategory(category));
        }
        Ok(self
            .categories
            .entry(category)
            .or_default()
            .insert(owner.into(), external_id.into()))
    }

    /// Whether `category` collides with the sentinel key.
    pub fn is_reserved(category: &str) -> bool {
        category == ACTIVE_KEY
    }

    /// Removes a binding. Empty categories are kept.
    pub fn remove(&mut self, category: &str, owner: &str) -> Option<String> {
        self.categories.get_mut(category)?.remove(owner)
    }

    /// Returns the bindings of one category.
    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, String>> {
        self.categories.get(category)
    }

    /// Iterates over category names.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of bindings per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        self.categories
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }

    /// Total number of bindings across all categories.
    pub fn binding_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
