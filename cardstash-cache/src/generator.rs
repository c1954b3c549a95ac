//! The artifact generator boundary.
//!
//! Rendering happens out of process. The core only needs a request/response
//! contract: given an owner, an output directory and the entities, produce
//! one artifact per requested entity and report success for the batch.

use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use cardstash_types::{Entity, EntityId, OwnerId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

const SUCCESS_MARKER: &str = "SUCCESS:";
const ERROR_MARKER: &str = "ERROR:";

/// Which artifacts a generation request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationTarget {
    /// One artifact per entity in the request.
    All,
    /// A single entity's artifact.
    Single(EntityId),
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub owner: OwnerId,
    /// Directory the artifacts must be written to.
    pub output_dir: PathBuf,
    /// The owner's full entity list.
    pub entities: Vec<Entity>,
    pub target: GenerationTarget,
}

/// What the generator reported on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Everything after the `SUCCESS:` marker.
    pub payload: String,
}

/// Out-of-process artifact renderer.
///
/// Implementations either produce every requested artifact and return a
/// report, or fail as a whole. There is no partial-progress reporting.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// Renders the requested artifacts into `request.output_dir`.
    async fn generate(&self, request: GenerationRequest) -> CacheResult<GenerationReport>;
}

/// Configuration for [`ProcessGenerator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Program to run (e.g. `python`).
    pub program: String,
    /// Arguments placed before the action (e.g. the script path).
    pub args: Vec<String>,
    /// Locale code passed as `--lang`.
    pub locale: String,
    /// Card template selector passed as `--template`.
    pub template: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["python/generate_card.py".to_string()],
            locale: "cht".to_string(),
            template: 2,
        }
    }
}

/// Runs the generator as a child process.
///
/// Invocation:
///
/// ```text
/// <program> [args..] generate <owner> --output <dir> --lang <locale>
///     --template <n> (--all | --character_id <id>)
/// ```
///
/// The entity list is written to the child's stdin as JSON. The last
/// non-empty line of stdout must be `SUCCESS:<payload>` or `ERROR:<message>`.
pub struct ProcessGenerator {
    config: GeneratorConfig,
}

impl ProcessGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn command(&self, request: &GenerationRequest) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .arg("generate")
            .arg(request.owner.as_str())
            .arg("--output")
            .arg(&request.output_dir)
            .arg("--lang")
            .arg(&self.config.locale)
            .arg("--template")
            .arg(self.config.template.to_string());

        match &request.target {
            GenerationTarget::All => {
                cmd.arg("--all");
            }
            GenerationTarget::Single(id) => {
                cmd.arg("--character_id").arg(id.as_str());
            }
        }

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl ArtifactGenerator for ProcessGenerator {
    async fn generate(&self, request: GenerationRequest) -> CacheResult<GenerationReport> {
        let body = serde_json::to_vec(&request.entities)?;
        let mut child = self.command(&request).spawn().map_err(|e| {
            CacheError::Generator(format!("failed to spawn {}: {e}", self.config.program))
        })?;

        info!(
            owner = %request.owner,
            target = ?request.target,
            entities = request.entities.len(),
            "Running artifact generator"
        );

        if let Some(mut stdin) = child.stdin.take() {
            // The generator may not read stdin at all; a closed pipe is fine.
            if let Err(e) = stdin.write_all(&body).await {
                debug!(error = %e, "Generator did not accept entity list on stdin");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CacheError::Generator(format!("failed to wait for generator: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_generator_output(&stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = match parsed {
                Err(CacheError::Generator(msg)) if stdout.contains(ERROR_MARKER) => msg,
                Err(CacheError::Generator(msg)) if stderr.is_empty() => msg,
                _ => stderr,
            };
            return Err(CacheError::Generator(format!(
                "generator exited with {}: {detail}",
                output.status
            )));
        }

        let payload = parsed?;
        Ok(GenerationReport { payload })
    }
}

/// Parses generator stdout.
///
/// Looks at the last non-empty line: `SUCCESS:<payload>` yields the payload,
/// `ERROR:<message>` and anything else yield [`CacheError::Generator`].
pub fn parse_generator_output(stdout: &str) -> CacheResult<String> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or_else(|| CacheError::Generator("generator produced no output".to_string()))?;

    if let Some(payload) = line.strip_prefix(SUCCESS_MARKER) {
        Ok(payload.to_string())
    } else if let Some(message) = line.strip_prefix(ERROR_MARKER) {
        Err(CacheError::Generator(message.to_string()))
    } else {
        Err(CacheError::Generator(format!("malformed generator output: {line}")))
    }
}
