//! JSON document store over HTTP.
//!
//! `GET {base}/{document}/latest` answers `{"record": <snapshot>, ...}`;
//! `PUT {base}/{document}` replaces the record with the request body.

use super::{MirrorRead, RemoteMirror};
use crate::config::MirrorConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use cardstash_types::Snapshot;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    #[serde(default)]
    record: Option<serde_json::Value>,
}

/// Remote mirror backed by a JSON document API.
pub struct HttpMirror {
    config: MirrorConfig,
    client: Client,
}

impl HttpMirror {
    /// Creates a mirror for the configured document.
    pub fn new(config: MirrorConfig) -> SyncResult<Self> {
        if !config.is_configured() {
            return Err(SyncError::Config(
                "remote document id and key are required".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Builds a mirror from `CARDSTASH_REMOTE_*`. `Ok(None)` means
    /// local-only mode.
    pub fn from_env() -> SyncResult<Option<Self>> {
        MirrorConfig::from_env().map(Self::new).transpose()
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    fn document_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.document_id
        )
    }

    fn latest_url(&self) -> String {
        format!("{}/latest", self.document_url())
    }
}

#[async_trait]
impl RemoteMirror for HttpMirror {
    fn provider_name(&self) -> &'static str {
        "http"
    }

    async fn read(&self) -> MirrorRead {
        let response = match self
            .client
            .get(self.latest_url())
            .header(self.config.auth_header.as_str(), self.config.api_key.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Remote read failed");
                return MirrorRead::Unavailable(format!("request failed: {e}"));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Remote document not found");
            return MirrorRead::Absent;
        }
        if !status.is_success() {
            warn!(%status, "Remote read rejected");
            return MirrorRead::Unavailable(format!("unexpected status {status}"));
        }

        let envelope: RecordEnvelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Remote response was not a record envelope");
                return MirrorRead::Unavailable(format!("invalid response: {e}"));
            }
        };

        match envelope.record {
            None => MirrorRead::Absent,
            Some(record) => match serde_json::from_value::<Snapshot>(record) {
                Ok(snapshot) => {
                    debug!(bindings = snapshot.binding_count(), "Read remote snapshot");
                    MirrorRead::Present(snapshot)
                }
                Err(e) => {
                    warn!(error = %e, "Remote record is not a snapshot");
                    MirrorRead::Unavailable(format!("invalid record: {e}"))
                }
            },
        }
    }

    async fn write(&self, snapshot: &Snapshot) -> bool {
        let result = self
            .client
            .put(self.document_url())
            .header(self.config.auth_header.as_str(), self.config.api_key.as_str())
            .json(snapshot)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(bindings = snapshot.binding_count(), "Wrote remote snapshot");
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "Remote write rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "Remote write failed");
                false
            }
        }
    }
}
