//! File handling and commands behind the `invsync` binary.
//!
//! The inventory is a JSON snapshot (an array of `{object_type, object}`
//! entries) loaded into a [`MemoryInventory`]; entities are a JSON array of
//! ingest records, or a single one.

use anyhow::{Context, Result, bail};
use invsync_engine::{
    IngestionLog, IngestionProcessor, IngestionWorker, MemoryInventory, Reconciler,
    ReconcilerConfig, SnapshotEntry,
};
use invsync_types::{ChangeSet, IngestEntity};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads an inventory snapshot. A missing file is an empty inventory.
pub fn load_inventory(path: &Path) -> Result<MemoryInventory> {
    if !path.exists() {
        info!("No inventory at {:?}, starting empty", path);
        return Ok(MemoryInventory::new());
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<SnapshotEntry> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse inventory snapshot {}", path.display()))?;
    debug!("Loaded {} inventory objects from {:?}", entries.len(), path);
    Ok(MemoryInventory::load(entries)?)
}

/// Loads ingest entities from a JSON array or a single JSON object.
pub fn load_entities(path: &Path) -> Result<Vec<IngestEntity>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let entities = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(value)?],
        _ => bail!("{} holds neither an entity nor a list of entities", path.display()),
    };
    Ok(entities)
}

/// Plans one change set per entity without touching the inventory.
#[must_use]
pub fn plan(
    entities: &[IngestEntity],
    inventory: Arc<MemoryInventory>,
    config: ReconcilerConfig,
) -> Vec<IngestionLog> {
    let reconciler = Reconciler::new(ReconcilerConfig {
        dry_run: true,
        ..config
    });
    IngestionProcessor::new(reconciler, inventory.clone(), inventory).process_request(entities)
}

/// Plans a single change set covering every entity.
pub fn plan_batch(
    entities: &[IngestEntity],
    inventory: &MemoryInventory,
    config: ReconcilerConfig,
) -> Result<ChangeSet> {
    Ok(Reconciler::new(config).prepare_batch(entities, inventory)?)
}

/// Reconciles every entity through the ingestion worker, applying change
/// sets to `inventory`. Logs come back in completion order.
pub async fn apply(
    entities: Vec<IngestEntity>,
    inventory: Arc<MemoryInventory>,
    config: ReconcilerConfig,
) -> Result<Vec<IngestionLog>> {
    let processor = IngestionProcessor::new(
        Reconciler::new(config.clone()),
        inventory.clone(),
        inventory,
    );
    let (sender, mut logs, handle) = IngestionWorker::new(processor, &config).spawn();

    let feeder = tokio::spawn(async move {
        for entity in entities {
            if sender.send(entity).await.is_err() {
                break;
            }
        }
    });

    let mut collected = Vec::new();
    while let Some(log) = logs.recv().await {
        collected.push(log);
    }
    feeder.await.context("Entity feeder failed")?;
    handle.await.context("Ingestion worker failed")?;
    Ok(collected)
}

/// Writes `value` as pretty JSON to `path`, or to stdout without one.
pub fn write_json<T: Serialize + ?Sized>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
