//! Periodic one-way push of the local snapshot to the remote.

use crate::config::ReplicatorConfig;
use crate::error::{SyncError, SyncResult};
use crate::local::SnapshotStore;
use crate::mirror::RemoteMirror;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Pushes the local snapshot to the remote on a fixed interval.
///
/// The timer task belongs to the replicator and is aborted on [`stop`]
/// or drop.
///
/// [`stop`]: ScheduledReplicator::stop
pub struct ScheduledReplicator {
    store: Arc<SnapshotStore>,
    mirror: Option<Arc<dyn RemoteMirror>>,
    config: ReplicatorConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ScheduledReplicator {
    /// `mirror: None` makes every push a no-op.
    pub fn new(
        store: Arc<SnapshotStore>,
        mirror: Option<Arc<dyn RemoteMirror>>,
        config: ReplicatorConfig,
    ) -> Self {
        Self {
            store,
            mirror,
            config,
            task: Mutex::new(None),
        }
    }

    /// Starts the timer on the current Tokio runtime. The first push happens
    /// one interval from now. Returns `false` if already running.
    ///
    /// A zero or unrepresentable interval is a [`SyncError::Config`].
    pub fn start(&self) -> SyncResult<bool> {
        let mut task = self.lock_task()?;
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("Replicator already running");
            return Ok(false);
        }

        let period = self.config.interval();
        if period.is_zero() {
            return Err(SyncError::Config(
                "replication interval must be non-zero".to_string(),
            ));
        }
        let first = Instant::now().checked_add(period).ok_or_else(|| {
            SyncError::Config(format!(
                "replication interval of {}s is out of range",
                period.as_secs()
            ))
        })?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SyncError::Runtime(e.to_string()))?;

        let store = Arc::clone(&self.store);
        let mirror = self.mirror.clone();

        *task = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match push(&store, mirror.as_deref()).await {
                    Ok(true) => debug!("Scheduled replication pushed local snapshot"),
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "Scheduled replication skipped"),
                }
            }
        }));

        info!(interval_secs = period.as_secs(), "Replicator started");
        Ok(true)
    }

    /// Cancels the timer. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        let Ok(mut task) = self.task.lock() else {
            return false;
        };
        match task.take() {
            Some(handle) => {
                handle.abort();
                info!("Replicator stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .map(|t| t.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Pushes the local snapshot once. `Ok(false)` when no mirror is
    /// configured or the remote rejected the write.
    pub async fn push_now(&self) -> SyncResult<bool> {
        push(&self.store, self.mirror.as_deref()).await
    }

    fn lock_task(&self) -> SyncResult<std::sync::MutexGuard<'_, Option<JoinHandle<()>>>> {
        self.task
            .lock()
            .map_err(|_| SyncError::Runtime("replicator lock poisoned".to_string()))
    }
}

impl Drop for ScheduledReplicator {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}

async fn push(store: &SnapshotStore, mirror: Option<&dyn RemoteMirror>) -> SyncResult<bool> {
    let Some(mirror) = mirror else {
        debug!("No remote mirror, skipping push");
        return Ok(false);
    };
    let snapshot = store.ensure().await?;
    Ok(mirror.write(&snapshot).await)
}
