//! cardstash operator CLI
//!
//! Usage:
//!   cardstash reconcile --timeout 60
//!   cardstash link hsr alice 800000001
//!   cardstash refresh alice profile.json
//!
//! The remote mirror is configured through `CARDSTASH_REMOTE_DOCUMENT`,
//! `CARDSTASH_REMOTE_KEY` and optionally `CARDSTASH_REMOTE_URL`. Without
//! them every command runs against the local snapshot only.

use anyhow::{bail, Context, Result};
use cardstash_cache::{CacheConfig, CacheStore, ProcessGenerator, RefreshOutcome, Refresher};
use cardstash_cli::{describe, load_entities, Cli, Command, PromptDecision};
use cardstash_sync::{
    HttpMirror, ReconcileConfig, ReconciliationCoordinator, RemoteMirror, ReplicatorConfig,
    ScheduledReplicator, SnapshotStore,
};
use cardstash_types::{EntityId, OwnerId};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let store = Arc::new(SnapshotStore::open(cli.snapshot.clone(), cli.categories.clone()));
    let cache = CacheStore::new(CacheConfig {
        root: cli.cache_root.clone(),
        ..Default::default()
    });

    match cli.command {
        Command::Reconcile { timeout } => {
            let coordinator = ReconciliationCoordinator::new(
                store,
                remote_mirror()?,
                Arc::new(PromptDecision::stdin()),
                ReconcileConfig {
                    decision_timeout_secs: timeout,
                },
            );
            let resolution = coordinator
                .reconcile()
                .await
                .context("reconciliation failed")?;
            println!("{}", describe(resolution));
        }
        Command::Push => {
            let replicator =
                ScheduledReplicator::new(store, remote_mirror()?, ReplicatorConfig::default());
            if replicator.push_now().await? {
                println!("Pushed local snapshot");
            } else {
                println!("Nothing pushed");
            }
        }
        Command::Replicate { interval } => {
            let Some(mirror) = remote_mirror()? else {
                bail!("remote mirror not configured");
            };
            let replicator = ScheduledReplicator::new(
                store,
                Some(mirror),
                ReplicatorConfig {
                    interval_secs: interval,
                },
            );
            replicator.start()?;
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            replicator.stop();
            info!("Shutting down");
        }
        Command::Link {
            category,
            owner,
            external,
        } => match store.bind(&category, &owner, &external).await? {
            Some(previous) => println!("{category}/{owner}: {previous} -> {external}"),
            None => println!("{category}/{owner}: {external}"),
        },
        Command::Unlink { category, owner } => match store.unbind(&category, &owner).await? {
            Some(previous) => println!("{category}/{owner}: removed {previous}"),
            None => println!("{category}/{owner}: not linked"),
        },
        Command::Status { owner, entities } => {
            let owner = OwnerId::parse(owner)?;
            let entities = load_entities(&entities).await?;
            for entity in &entities {
                let state = if cache.needs_regeneration(&owner, entity).await {
                    "stale"
                } else {
                    "current"
                };
                println!("{}\t{}\t{state}", entity.id, entity.name);
            }
        }
        Command::Refresh {
            owner,
            entities,
            force,
            entity,
            generator,
        } => {
            let owner = OwnerId::parse(owner)?;
            let entities = load_entities(&entities).await?;
            let refresher =
                Refresher::new(cache, Arc::new(ProcessGenerator::new(generator.into_config())));

            if let Some(entity) = entity {
                let entity = EntityId::parse(entity)?;
                let path = refresher.render_single(&owner, &entities, &entity).await?;
                println!("{}", path.display());
                return Ok(());
            }

            let outcome = if force {
                refresher.regenerate(&owner, &entities).await?
            } else {
                refresher.refresh(&owner, &entities).await?
            };
            match outcome {
                RefreshOutcome::Fresh => println!("All artifacts current"),
                RefreshOutcome::Regenerated { count, payload } => {
                    println!("Regenerated {count} artifacts: {payload}")
                }
            }
        }
    }

    Ok(())
}

fn remote_mirror() -> Result<Option<Arc<dyn RemoteMirror>>> {
    let mirror = HttpMirror::from_env().context("invalid remote mirror configuration")?;
    if mirror.is_none() {
        info!("Remote mirror not configured, running local-only");
    }
    Ok(mirror.map(|m| Arc::new(m) as Arc<dyn RemoteMirror>))
}
