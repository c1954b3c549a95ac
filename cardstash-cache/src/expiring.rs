//! A keyed container whose entries expire after a fixed time-to-live.
//!
//! Used for short-lived per-user state such as a pending character selection.
//! Expired entries are invisible to lookups and are dropped either lazily on
//! access or in bulk through [`ExpiringMap::evict_expired`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    /// `None` when the deadline is past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> Slot<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Map with per-entry expiry.
#[derive(Debug, Clone)]
pub struct ExpiringMap<K, V> {
    ttl: Duration,
    entries: HashMap<K, Slot<V>>,
}

impl<K: Eq + Hash, V> ExpiringMap<K, V> {
    /// Creates an empty map whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Inserts a value, resetting its expiry. Returns the previous live
    /// value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let now = Instant::now();
        let slot = Slot {
            value,
            expires_at: now.checked_add(self.ttl),
        };
        self.entries
            .insert(key, slot)
            .filter(|old| old.is_live(now))
            .map(|old| old.value)
    }

    /// Returns a live value. An expired entry is removed and `None` returned.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        if self.entries.get(key).is_some_and(|slot| !slot.is_live(now)) {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Whether a live entry exists for `key`. Does not evict.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.entries.get(key).is_some_and(|slot| slot.is_live(now))
    }

    /// Removes an entry, returning its value if it was still live.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.entries
            .remove(key)
            .filter(|slot| slot.is_live(now))
            .map(|slot| slot.value)
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| slot.is_live(now));
        before - self.entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
