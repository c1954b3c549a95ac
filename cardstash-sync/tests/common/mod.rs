//! Shared test helpers for sync tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cardstash_sync::{Choice, DecisionChannel, DivergenceReport, MirrorRead, RemoteMirror};
use cardstash_types::Snapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const CATEGORIES: [&str; 2] = ["hsr", "zzz"];

pub fn categories() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// An active snapshot holding the given `(category, owner, external)`
/// bindings.
pub fn snapshot_with(bindings: &[(&str, &str, &str)]) -> Snapshot {
    let mut snapshot = Snapshot::empty(CATEGORIES);
    for (category, owner, external) in bindings {
        snapshot.insert(*category, *owner, *external).unwrap();
    }
    snapshot
}

/// In-memory remote that counts reads and writes.
#[derive(Default)]
pub struct MemoryMirror {
    document: Mutex<Option<Snapshot>>,
    unavailable: bool,
    reject_writes: bool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryMirror {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(snapshot: Snapshot) -> Self {
        Self {
            document: Mutex::new(Some(snapshot)),
            ..Default::default()
        }
    }

    /// A remote whose reads always fail.
    pub fn unreachable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// Accepts writes but never stores them.
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn document(&self) -> Option<Snapshot> {
        self.document.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteMirror for MemoryMirror {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> MirrorRead {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return MirrorRead::Unavailable("unreachable".to_string());
        }
        match self.document() {
            Some(snapshot) => MirrorRead::Present(snapshot),
            None => MirrorRead::Absent,
        }
    }

    async fn write(&self, snapshot: &Snapshot) -> bool {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes {
            return false;
        }
        *self.document.lock().unwrap() = Some(snapshot.clone());
        true
    }
}

/// Decider that answers immediately, or never when `choice` is `None`.
pub struct ScriptedDecision {
    choice: Option<Choice>,
    requests: AtomicUsize,
    last_report: Mutex<Option<DivergenceReport>>,
}

impl ScriptedDecision {
    pub fn answering(choice: Choice) -> Self {
        Self {
            choice: Some(choice),
            requests: AtomicUsize::new(0),
            last_report: Mutex::new(None),
        }
    }

    pub fn silent() -> Self {
        Self {
            choice: None,
            requests: AtomicUsize::new(0),
            last_report: Mutex::new(None),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_report(&self) -> Option<DivergenceReport> {
        self.last_report.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionChannel for ScriptedDecision {
    async fn request_decision(&self, report: &DivergenceReport) -> Option<Choice> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_report.lock().unwrap() = Some(report.clone());
        match self.choice {
            Some(choice) => Some(choice),
            None => std::future::pending().await,
        }
    }
}
