//! invsync: plan and apply inventory change sets from the command line.
//!
//! Usage:
//!   invsync plan --inventory inventory.json --entities entities.json
//!   invsync apply --inventory inventory.json --entities entities.json

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use invsync_cli::{apply, load_entities, load_inventory, plan, plan_batch, write_json};
use invsync_engine::{IngestionState, ReconcilerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "invsync")]
#[command(about = "Reconcile network inventory entities against an inventory snapshot")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Inventory snapshot (JSON); a missing file is an empty inventory
    #[arg(short, long, global = true, default_value = "inventory.json")]
    inventory: PathBuf,

    /// Issue every lookup, even identical ones
    #[arg(long, global = true)]
    no_memoize: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the change sets the entities would produce
    Plan {
        /// Ingest entities (JSON array or single object)
        #[arg(short, long)]
        entities: PathBuf,

        /// Plan one change set for all entities
        #[arg(long)]
        batch: bool,

        /// Write the plan here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply the entities and write the updated inventory snapshot
    Apply {
        /// Ingest entities (JSON array or single object)
        #[arg(short, long)]
        entities: PathBuf,

        /// Entities reconciled at the same time
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Write the snapshot here instead of over the inventory file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let config = ReconcilerConfig {
        memoize_lookups: !args.no_memoize,
        ..ReconcilerConfig::default()
    };
    let inventory = Arc::new(load_inventory(&args.inventory)?);

    match args.command {
        Command::Plan {
            entities,
            batch,
            output,
        } => {
            let entities = load_entities(&entities)?;
            if batch {
                let change_set = plan_batch(&entities, &inventory, config)?;
                write_json(output.as_deref(), &change_set)?;
            } else {
                let logs = plan(&entities, inventory, config);
                write_json(output.as_deref(), &logs)?;
            }
        }
        Command::Apply {
            entities,
            concurrency,
            output,
        } => {
            let entities = load_entities(&entities)?;
            let config = ReconcilerConfig {
                max_concurrent_entities: concurrency,
                ..config
            };
            let logs = apply(entities, inventory.clone(), config).await?;
            for log in logs.iter().filter(|l| l.state == IngestionState::Failed) {
                warn!(
                    "{} entity failed: {}",
                    log.data_type,
                    log.error.as_deref().unwrap_or_default()
                );
            }
            let reconciled = logs
                .iter()
                .filter(|l| l.state == IngestionState::Reconciled)
                .count();
            info!("Reconciled {}/{} entities", reconciled, logs.len());

            let target = output.unwrap_or(args.inventory);
            write_json(Some(target.as_path()), &inventory.snapshot())?;
            info!("Inventory written to {:?}", target);
        }
    }
    Ok(())
}
