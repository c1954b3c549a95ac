//! Startup reconciliation between the local and remote snapshots.

use crate::config::ReconcileConfig;
use crate::decision::{Choice, DecisionChannel, DivergenceReport};
use crate::error::SyncResult;
use crate::local::SnapshotStore;
use crate::mirror::RemoteMirror;
use cardstash_types::Snapshot;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// How a reconciliation pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No mirror configured; only the local snapshot was ensured.
    RemoteDisabled,
    /// The remote held nothing trustworthy; local was pushed.
    RemoteMissing,
    /// Both sides were already equal.
    InSync,
    /// The decider picked local; remote was overwritten.
    LocalChosen,
    /// The decider picked remote; local was overwritten.
    RemoteChosen,
    /// Nobody answered in time; remote was overwritten with local.
    TimedOut,
}

impl Resolution {
    /// Whether this outcome pushed the local snapshot to the remote.
    pub fn pushed_local(self) -> bool {
        matches!(
            self,
            Self::RemoteMissing | Self::LocalChosen | Self::TimedOut
        )
    }
}

/// Observable coordinator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileState {
    Idle,
    Comparing,
    AwaitingDecision,
    Resolved(Resolution),
    Failed(String),
}

/// Detects and resolves divergence between the local and remote snapshots.
///
/// Resolution always replaces one side wholesale; bindings are never merged.
pub struct ReconciliationCoordinator {
    store: Arc<SnapshotStore>,
    mirror: Option<Arc<dyn RemoteMirror>>,
    decisions: Arc<dyn DecisionChannel>,
    config: ReconcileConfig,
    state: RwLock<ReconcileState>,
}

impl ReconciliationCoordinator {
    /// `mirror: None` runs in local-only mode.
    pub fn new(
        store: Arc<SnapshotStore>,
        mirror: Option<Arc<dyn RemoteMirror>>,
        decisions: Arc<dyn DecisionChannel>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            store,
            mirror,
            decisions,
            config,
            state: RwLock::new(ReconcileState::Idle),
        }
    }

    /// Returns the current state.
    pub async fn state(&self) -> ReconcileState {
        self.state.read().await.clone()
    }

    async fn set_state(&self, state: ReconcileState) {
        debug!(?state, "Reconciliation state");
        *self.state.write().await = state;
    }

    async fn resolve(&self, resolution: Resolution) -> SyncResult<Resolution> {
        info!(?resolution, "Reconciliation finished");
        self.set_state(ReconcileState::Resolved(resolution)).await;
        Ok(resolution)
    }

    /// Runs one reconciliation pass.
    ///
    /// Only local store failures are errors; remote trouble degrades to
    /// pushing the local snapshot. Safe to run again after it returns.
    pub async fn reconcile(&self) -> SyncResult<Resolution> {
        self.set_state(ReconcileState::Comparing).await;

        let local = match self.store.ensure().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Local snapshot unavailable");
                self.set_state(ReconcileState::Failed(e.to_string())).await;
                return Err(e);
            }
        };

        let Some(mirror) = &self.mirror else {
            return self.resolve(Resolution::RemoteDisabled).await;
        };

        mirror.initialize(self.store.categories()).await;

        let Some(remote) = mirror.read().await.into_active() else {
            warn!(
                provider = mirror.provider_name(),
                "Remote snapshot missing, pushing local"
            );
            push(mirror.as_ref(), &local).await;
            return self.resolve(Resolution::RemoteMissing).await;
        };

        if remote == local {
            return self.resolve(Resolution::InSync).await;
        }

        info!(
            local = local.binding_count(),
            remote = remote.binding_count(),
            "Local and remote snapshots differ"
        );
        self.set_state(ReconcileState::AwaitingDecision).await;

        let timeout = self.config.decision_timeout();
        let report = DivergenceReport::new(local.clone(), remote.clone(), timeout);
        let choice = tokio::time::timeout(timeout, self.decisions.request_decision(&report))
            .await
            .ok()
            .flatten();

        match choice {
            Some(Choice::Local) => {
                push(mirror.as_ref(), &local).await;
                self.resolve(Resolution::LocalChosen).await
            }
            Some(Choice::Remote) => {
                if let Err(e) = self.store.save(&remote).await {
                    error!(error = %e, "Failed to replace local snapshot");
                    self.set_state(ReconcileState::Failed(e.to_string())).await;
                    return Err(e);
                }
                self.resolve(Resolution::RemoteChosen).await
            }
            None => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "No decision received, keeping local snapshot"
                );
                push(mirror.as_ref(), &local).await;
                self.resolve(Resolution::TimedOut).await
            }
        }
    }
}

async fn push(mirror: &dyn RemoteMirror, local: &Snapshot) {
    if !mirror.write(local).await {
        warn!(
            provider = mirror.provider_name(),
            "Remote overwrite failed; it will be retried by the next replication"
        );
    }
}
