//! Configuration for the remote mirror, reconciliation and replication.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the remote base URL.
pub const ENV_REMOTE_URL: &str = "CARDSTASH_REMOTE_URL";
/// Environment variable holding the remote document id.
pub const ENV_REMOTE_DOCUMENT: &str = "CARDSTASH_REMOTE_DOCUMENT";
/// Environment variable holding the remote API key.
pub const ENV_REMOTE_KEY: &str = "CARDSTASH_REMOTE_KEY";
/// Environment variable overriding the auth header name.
pub const ENV_REMOTE_HEADER: &str = "CARDSTASH_REMOTE_HEADER";

/// Remote document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Base URL of the document API (e.g. `https://api.jsonbin.io/v3/b`).
    pub base_url: String,
    /// Id of the single mirrored document.
    pub document_id: String,
    /// Credential sent in `auth_header`.
    pub api_key: String,
    /// Name of the header carrying the credential.
    pub auth_header: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jsonbin.io/v3/b".to_string(),
            document_id: String::new(),
            api_key: String::new(),
            auth_header: "X-Master-Key".to_string(),
            timeout_secs: 30,
        }
    }
}

impl MirrorConfig {
    /// Reads the configuration from `CARDSTASH_REMOTE_*` environment
    /// variables. Returns `None` (local-only mode) unless both a document id
    /// and a key are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let document_id = non_empty(ENV_REMOTE_DOCUMENT)?;
        let api_key = non_empty(ENV_REMOTE_KEY)?;
        let defaults = Self::default();

        Some(Self {
            base_url: non_empty(ENV_REMOTE_URL).unwrap_or(defaults.base_url),
            document_id,
            api_key,
            auth_header: non_empty(ENV_REMOTE_HEADER).unwrap_or(defaults.auth_header),
            timeout_secs: defaults.timeout_secs,
        })
    }

    /// Whether credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.document_id.is_empty() && !self.api_key.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// How long to wait for a human decision before keeping local (seconds).
    pub decision_timeout_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            decision_timeout_secs: 60,
        }
    }
}

impl ReconcileConfig {
    pub fn decision_timeout(&self) -> Duration {
        Duration::from_secs(self.decision_timeout_secs)
    }
}

/// Scheduled replication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicatorConfig {
    /// Seconds between pushes.
    pub interval_secs: u64,
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 6 * 60 * 60,
        }
    }
}

impl ReplicatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
