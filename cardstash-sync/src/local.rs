//! Local snapshot store.
//!
//! The account-link snapshot is a single JSON document on disk. The store
//! can also be backed by memory, which the coordinator and replicator treat
//! identically.

use crate::error::{SyncError, SyncResult};
use cardstash_types::Snapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

enum Backing {
    File(PathBuf),
    Memory(Mutex<Option<Snapshot>>),
}

/// Owner of the local [`Snapshot`].
///
/// There is no file locking; the store assumes a single logical writer.
pub struct SnapshotStore {
    backing: Backing,
    categories: Vec<String>,
}

impl SnapshotStore {
    /// Opens a file-backed store. Nothing is read until the first call.
    pub fn open<I, S>(path: impl Into<PathBuf>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backing: Backing::File(path.into()),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a store that keeps the snapshot in memory.
    pub fn in_memory<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backing: Backing::Memory(Mutex::new(None)),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Categories an empty snapshot is created with.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    /// Loads the snapshot. `Ok(None)` if it was never written.
    pub async fn load(&self) -> SyncResult<Option<Snapshot>> {
        match &self.backing {
            Backing::File(path) => {
                let raw = match tokio::fs::read_to_string(path).await {
                    Ok(raw) => raw,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                    Err(e) => {
                        return Err(SyncError::Storage(format!(
                            "failed to read {}: {e}",
                            path.display()
                        )));
                    }
                };
                let snapshot = Snapshot::from_json(&raw).map_err(|e| {
                    SyncError::Storage(format!("corrupt snapshot {}: {e}", path.display()))
                })?;
                Ok(Some(snapshot))
            }
            Backing::Memory(slot) => Ok(lock(slot)?.clone()),
        }
    }

    /// Replaces the stored snapshot wholesale.
    pub async fn save(&self, snapshot: &Snapshot) -> SyncResult<()> {
        match &self.backing {
            Backing::File(path) => {
                let json = snapshot.to_json_pretty()?;
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        SyncError::Storage(format!("failed to create {}: {e}", parent.display()))
                    })?;
                }
                let tmp = path.with_extension("json.tmp");
                tokio::fs::write(&tmp, json)
                    .await
                    .map_err(|e| SyncError::Storage(format!("failed to write {}: {e}", tmp.display())))?;
                tokio::fs::rename(&tmp, path).await.map_err(|e| {
                    SyncError::Storage(format!("failed to replace {}: {e}", path.display()))
                })?;
                debug!(path = %path.display(), "Saved local snapshot");
            }
            Backing::Memory(slot) => {
                *lock(slot)? = Some(snapshot.clone());
            }
        }
        Ok(())
    }

    /// Returns the active local snapshot, materializing an empty one if the
    /// store was never written or holds an inactive snapshot.
    pub async fn ensure(&self) -> SyncResult<Snapshot> {
        if let Some(snapshot) = self.load().await?
            && snapshot.is_active()
        {
            return Ok(snapshot);
        }

        let snapshot = Snapshot::empty(&self.categories);
        self.save(&snapshot).await?;
        info!(
            categories = self.categories.len(),
            "Created empty local snapshot"
        );
        Ok(snapshot)
    }

    /// Binds `owner` to `external` in `category`, returning the previous
    /// binding.
    pub async fn bind(
        &self,
        category: &str,
        owner: &str,
        external: &str,
    ) -> SyncResult<Option<String>> {
        if Snapshot::is_reserved(category) {
            return Err(SyncError::Config(format!("reserved category: {category}")));
        }
        let mut snapshot = self.ensure().await?;
        if snapshot.category(category).is_none() && !self.categories.iter().any(|c| c == category)
        {
            return Err(SyncError::Config(format!("unknown category: {category}")));
        }
        let previous = snapshot.insert(category, owner, external)?;
        self.save(&snapshot).await?;
        Ok(previous)
    }

    /// Removes the binding for `owner` in `category`.
    pub async fn unbind(&self, category: &str, owner: &str) -> SyncResult<Option<String>> {
        let mut snapshot = self.ensure().await?;
        let removed = snapshot.remove(category, owner);
        if removed.is_some() {
            self.save(&snapshot).await?;
        }
        Ok(removed)
    }

    /// Looks up the external id bound to `owner` in `category`.
    pub async fn lookup(&self, category: &str, owner: &str) -> SyncResult<Option<String>> {
        Ok(self
            .load()
            .await?
            .and_then(|s| s.get(category, owner).map(str::to_string)))
    }
}

fn lock(slot: &Mutex<Option<Snapshot>>) -> SyncResult<std::sync::MutexGuard<'_, Option<Snapshot>>> {
    slot.lock()
        .map_err(|_| SyncError::Storage("snapshot lock poisoned".to_string()))
}
