//! Remote mirror of the account-link snapshot.
//!
//! The remote holds exactly one document, always read and written whole.

pub mod http;

pub use http::HttpMirror;

use async_trait::async_trait;
use cardstash_types::Snapshot;
use tracing::info;

/// Outcome of reading the remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorRead {
    /// The document exists and parsed.
    Present(Snapshot),
    /// The document was never written.
    Absent,
    /// The remote could not be reached or returned something unusable.
    Unavailable(String),
}

impl MirrorRead {
    /// The remote snapshot, if one was read. `Absent` and `Unavailable`
    /// both collapse to `None`.
    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            Self::Present(snapshot) => Some(snapshot),
            Self::Absent | Self::Unavailable(_) => None,
        }
    }

    /// The remote snapshot if it is present and active.
    pub fn into_active(self) -> Option<Snapshot> {
        self.into_snapshot().filter(Snapshot::is_active)
    }
}

/// Whole-document access to the remote store.
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    /// Returns the mirror name for logging.
    fn provider_name(&self) -> &'static str;

    /// Reads the remote document. Never fails; transport and parse errors
    /// are reported as [`MirrorRead::Unavailable`].
    async fn read(&self) -> MirrorRead;

    /// Overwrites the remote document. Returns whether the write succeeded.
    async fn write(&self, snapshot: &Snapshot) -> bool;

    /// Writes an empty active snapshot unless the remote already holds an
    /// active one. Returns whether a snapshot was written.
    async fn initialize(&self, categories: &[String]) -> bool {
        match self.read().await {
            MirrorRead::Present(snapshot) if snapshot.is_active() => false,
            other => {
                info!(
                    provider = self.provider_name(),
                    previous = ?other,
                    "Initializing remote snapshot"
                );
                self.write(&Snapshot::empty(categories)).await
            }
        }
    }
}
