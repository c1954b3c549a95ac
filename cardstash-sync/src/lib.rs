//! Snapshot reconciliation and replication for cardstash.
//!
//! The account-link [`Snapshot`](cardstash_types::Snapshot) lives in two
//! places: a local JSON file and a remote JSON document. This crate keeps
//! them aligned.
//!
//! ## Components
//!
//! - **SnapshotStore**: the local file (or an in-memory stand-in)
//! - **RemoteMirror**: whole-document read/write against the remote store
//! - **DecisionChannel**: asks a human which side wins when they diverge
//! - **ReconciliationCoordinator**: the startup detect-and-resolve pass
//! - **ScheduledReplicator**: periodic one-way push of the local snapshot
//!
//! ## Reconciliation
//!
//! 1. Make sure the local snapshot exists
//! 2. Initialize the remote document if it was never written
//! 3. Read the remote; if it cannot be trusted, push local
//! 4. Equal snapshots need no writes
//! 5. Otherwise ask for `local` or `remote`, bounded by a timeout
//! 6. Overwrite the losing side wholesale; on timeout, local wins
//!
//! # Example
//!
//! ```no_run
//! use cardstash_sync::{
//!     HttpMirror, NoDecision, ReconcileConfig, ReconciliationCoordinator, RemoteMirror,
//!     SnapshotStore,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> cardstash_sync::SyncResult<()> {
//! let store = Arc::new(SnapshotStore::open("data/links.json", ["hsr", "zzz"]));
//! let mirror = HttpMirror::from_env()?.map(|m| Arc::new(m) as Arc<dyn RemoteMirror>);
//!
//! let coordinator = ReconciliationCoordinator::new(
//!     store,
//!     mirror,
//!     Arc::new(NoDecision),
//!     ReconcileConfig::default(),
//! );
//! let resolution = coordinator.reconcile().await?;
//! println!("{resolution:?}");
//! # Ok(())
//! # }
//! ```

mod config;
pub mod decision;
mod error;
mod local;
pub mod mirror;
mod reconcile;
mod replicator;

pub use config::{MirrorConfig, ReconcileConfig, ReplicatorConfig};
pub use decision::{
    decision_channel, ChannelDecision, Choice, DecisionChannel, DecisionReceiver,
    DivergenceReport, NoDecision, PendingDecision,
};
pub use error::{SyncError, SyncResult};
pub use local::SnapshotStore;
pub use mirror::{HttpMirror, MirrorRead, RemoteMirror};
pub use reconcile::{ReconcileState, ReconciliationCoordinator, Resolution};
pub use replicator::ScheduledReplicator;
