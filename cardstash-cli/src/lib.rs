//! Command-line surface and terminal helpers for the `cardstash` binary.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cardstash_cache::GeneratorConfig;
use cardstash_sync::{Choice, DecisionChannel, DivergenceReport, Resolution};
use cardstash_types::profile::ShowcaseProfile;
use cardstash_types::Entity;
use clap::{Args, Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "cardstash")]
#[command(about = "Fingerprinted card cache and account-link reconciliation")]
pub struct Cli {
    /// Path to the local account-link snapshot
    #[arg(long, global = true, default_value = "data/links.json")]
    pub snapshot: PathBuf,

    /// Categories an empty snapshot is created with
    #[arg(long, global = true, value_delimiter = ',', default_value = "hsr,zzz")]
    pub categories: Vec<String>,

    /// Root directory of the artifact cache
    #[arg(long, global = true, default_value = "cache/cards")]
    pub cache_root: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare local and remote link data and resolve any divergence
    Reconcile {
        /// Seconds to wait for an answer before keeping local
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },
    /// Push the local link data to the remote once
    Push,
    /// Push the local link data periodically until interrupted
    Replicate {
        /// Seconds between pushes
        #[arg(long, default_value_t = 6 * 60 * 60)]
        interval: u64,
    },
    /// Bind an owner to an external account id
    Link {
        category: String,
        owner: String,
        external: String,
    },
    /// Remove an owner's binding
    Unlink { category: String, owner: String },
    /// Show which cached artifacts are stale
    Status {
        owner: String,
        /// Entity list or profile JSON
        entities: PathBuf,
    },
    /// Regenerate stale artifacts through the external generator
    Refresh {
        owner: String,
        /// Entity list or profile JSON
        entities: PathBuf,
        /// Regenerate even if every artifact is current
        #[arg(long)]
        force: bool,
        /// Render only this entity, leaving the manifest alone
        #[arg(long, conflicts_with = "force")]
        entity: Option<String>,
        #[command(flatten)]
        generator: GeneratorArgs,
    },
}

/// Overrides for the generator process.
#[derive(Args, Debug, Default)]
pub struct GeneratorArgs {
    /// Generator program
    #[arg(long)]
    pub program: Option<String>,
    /// Argument placed before the action; repeat for several
    #[arg(long = "program-arg")]
    pub program_args: Vec<String>,
    /// Locale code
    #[arg(long)]
    pub lang: Option<String>,
    /// Template number
    #[arg(long)]
    pub template: Option<u8>,
}

impl GeneratorArgs {
    pub fn into_config(self) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        GeneratorConfig {
            program: self.program.unwrap_or(defaults.program),
            args: if self.program_args.is_empty() {
                defaults.args
            } else {
                self.program_args
            },
            locale: self.lang.unwrap_or(defaults.locale),
            template: self.template.unwrap_or(defaults.template),
        }
    }
}

/// Reads entities from a file holding either a JSON array of entities or a
/// profile payload, optionally prefixed with `SUCCESS:`.
pub async fn load_entities(path: &Path) -> Result<Vec<Entity>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_entities(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_entities(raw: &str) -> Result<Vec<Entity>> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("SUCCESS:").unwrap_or(raw).trim_start();
    if raw.starts_with('[') {
        return Ok(serde_json::from_str(raw)?);
    }
    Ok(ShowcaseProfile::from_json(raw)?.entities())
}

/// One-line description of a reconciliation outcome.
pub fn describe(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::RemoteDisabled => "Remote not configured; local snapshot ready",
        Resolution::RemoteMissing => "Remote had no usable snapshot; pushed local",
        Resolution::InSync => "Local and remote already match",
        Resolution::LocalChosen => "Kept local; remote overwritten",
        Resolution::RemoteChosen => "Kept remote; local overwritten",
        Resolution::TimedOut => "No answer in time; kept local and overwrote remote",
    }
}

/// Asks on the terminal which snapshot to keep.
///
/// Answers are read line by line on a dedicated OS thread and handed over a
/// channel, so a read still pending when the coordinator gives up never keeps
/// the runtime from shutting down. Unrecognized answers re-prompt; end of
/// input counts as no answer.
pub struct PromptDecision {
    lines: Mutex<mpsc::Receiver<String>>,
}

impl PromptDecision {
    pub fn new<R>(input: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let reader = std::thread::Builder::new()
            .name("decision-prompt".to_string())
            .spawn(move || {
                for line in input.lines() {
                    let Ok(line) = line else { break };
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            warn!(error = %e, "Failed to start prompt reader, decisions will time out");
        }
        Self {
            lines: Mutex::new(rx),
        }
    }

    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }
}

#[async_trait]
impl DecisionChannel for PromptDecision {
    async fn request_decision(&self, report: &DivergenceReport) -> Option<Choice> {
        eprintln!("Local and remote link data differ:\n{}", report.summary());
        let mut lines = self.lines.lock().await;
        loop {
            eprint!("Keep which copy? [local/remote]: ");
            let line = lines.recv().await?;
            match line.parse::<Choice>() {
                Ok(choice) => return Some(choice),
                Err(e) => eprintln!("{e}"),
            }
        }
    }
}
