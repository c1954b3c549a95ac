//! Asking a human which side wins when the snapshots diverge.
//!
//! The coordinator hands a [`DivergenceReport`] to a [`DecisionChannel`] and
//! waits for at most one [`Choice`]. A channel that never answers is fine;
//! the coordinator applies its own timeout.

use async_trait::async_trait;
use cardstash_types::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Which snapshot becomes authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Local,
    Remote,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "l" => Ok(Self::Local),
            "remote" | "r" => Ok(Self::Remote),
            other => Err(format!("expected 'local' or 'remote', got '{other}'")),
        }
    }
}

/// Both versions of a diverged snapshot, as shown to the decider.
#[derive(Debug, Clone)]
pub struct DivergenceReport {
    pub local: Snapshot,
    pub remote: Snapshot,
    pub local_counts: BTreeMap<String, usize>,
    pub remote_counts: BTreeMap<String, usize>,
    /// How long the decider has before local wins.
    pub timeout: Duration,
}

impl DivergenceReport {
    pub fn new(local: Snapshot, remote: Snapshot, timeout: Duration) -> Self {
        Self {
            local_counts: local.category_counts(),
            remote_counts: remote.category_counts(),
            local,
            remote,
            timeout,
        }
    }

    /// Categories whose bindings differ between the two sides.
    pub fn differing_categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .local
            .category_names()
            .chain(self.remote.category_names())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
            .into_iter()
            .filter(|name| self.local.category(name) != self.remote.category(name))
            .collect()
    }

    /// One line per category with both binding counts.
    pub fn summary(&self) -> String {
        let mut names: Vec<&String> = self
            .local_counts
            .keys()
            .chain(self.remote_counts.keys())
            .collect();
        names.sort_unstable();
        names.dedup();

        let mut out = String::new();
        for name in names {
            let local = self.local_counts.get(name).copied().unwrap_or(0);
            let remote = self.remote_counts.get(name).copied().unwrap_or(0);
            out.push_str(&format!("{name}: local {local} / remote {remote}\n"));
        }
        out.push_str(&format!(
            "No answer within {}s keeps local.",
            self.timeout.as_secs()
        ));
        out
    }
}

/// Something that can put a divergence in front of a human.
#[async_trait]
pub trait DecisionChannel: Send + Sync {
    /// Presents the report and resolves to the chosen side, or `None` if the
    /// channel closed without an answer. May never resolve.
    async fn request_decision(&self, report: &DivergenceReport) -> Option<Choice>;
}

/// A channel with nobody listening; every request ends without a choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecision;

#[async_trait]
impl DecisionChannel for NoDecision {
    async fn request_decision(&self, _report: &DivergenceReport) -> Option<Choice> {
        None
    }
}

/// A divergence waiting for an answer on the receiving side of
/// [`decision_channel`].
#[derive(Debug)]
pub struct PendingDecision {
    report: DivergenceReport,
    responder: oneshot::Sender<Choice>,
}

impl PendingDecision {
    pub fn report(&self) -> &DivergenceReport {
        &self.report
    }

    /// Answers the request. Returns `false` if the coordinator stopped
    /// waiting.
    pub fn resolve(self, choice: Choice) -> bool {
        self.responder.send(choice).is_ok()
    }
}

/// Receiving side of [`decision_channel`]; lives with the UI.
pub type DecisionReceiver = mpsc::Receiver<PendingDecision>;

/// Sending side of [`decision_channel`]; given to the coordinator.
#[derive(Debug, Clone)]
pub struct ChannelDecision {
    requests: mpsc::Sender<PendingDecision>,
}

/// Creates a decision channel whose requests are answered elsewhere, e.g. by
/// a chat message with two buttons.
pub fn decision_channel() -> (ChannelDecision, DecisionReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (ChannelDecision { requests: tx }, rx)
}

#[async_trait]
impl DecisionChannel for ChannelDecision {
    async fn request_decision(&self, report: &DivergenceReport) -> Option<Choice> {
        let (responder, answer) = oneshot::channel();
        let pending = PendingDecision {
            report: report.clone(),
            responder,
        };
        if self.requests.send(pending).await.is_err() {
            debug!("Decision receiver dropped");
            return None;
        }
        answer.await.ok()
    }
}
