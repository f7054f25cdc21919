//! Async ingestion worker.
//!
//! Consumes ingested entities from a channel and reconciles them on the
//! blocking pool, a bounded number at a time. Every entity produces exactly
//! one [`IngestionLog`] on the output channel, failures included; a failing
//! entity never stops the worker.

use crate::config::ReconcilerConfig;
use crate::ingestion::{IngestionLog, IngestionProcessor};
use invsync_types::IngestEntity;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Runs an [`IngestionProcessor`] over a stream of entities.
#[derive(Debug, Clone)]
pub struct IngestionWorker {
    processor: Arc<IngestionProcessor>,
    max_concurrent: usize,
    channel_capacity: usize,
}

impl IngestionWorker {
    #[must_use]
    pub fn new(processor: IngestionProcessor, config: &ReconcilerConfig) -> Self {
        Self {
            processor: Arc::new(processor),
            max_concurrent: config.max_concurrent_entities.max(1),
            channel_capacity: config.channel_capacity.max(1),
        }
    }

    /// Starts the worker on the current runtime.
    ///
    /// Returns the entity sender, the log receiver and the worker task. The
    /// task ends once every sender is dropped and all in-flight entities have
    /// been logged.
    pub fn spawn(
        self,
    ) -> (
        mpsc::Sender<IngestEntity>,
        mpsc::Receiver<IngestionLog>,
        JoinHandle<()>,
    ) {
        let (entity_tx, entity_rx) = mpsc::channel(self.channel_capacity);
        let (log_tx, log_rx) = mpsc::channel(self.channel_capacity);
        let handle = tokio::spawn(self.run(entity_rx, log_tx));
        (entity_tx, log_rx, handle)
    }

    /// Drains `entities` until the channel closes, sending one log per
    /// entity to `logs`.
    pub async fn run(
        self,
        mut entities: mpsc::Receiver<IngestEntity>,
        logs: mpsc::Sender<IngestionLog>,
    ) {
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut received = 0usize;

        while let Some(entity) = entities.recv().await {
            received += 1;
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };
            let processor = Arc::clone(&self.processor);
            let logs = logs.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let pending = IngestionLog::new(&entity);
                let task = tokio::task::spawn_blocking(move || processor.process_entity(&entity));
                let log = match task.await {
                    Ok(log) => log,
                    Err(e) => {
                        warn!(
                            "spawn_blocking panicked reconciling {}: {}",
                            pending.data_type, e
                        );
                        pending.failed(e)
                    }
                };
                debug!("Entity {} finished as {}", log.id, log.state);
                if logs.send(log).await.is_err() {
                    debug!("Ingestion log receiver dropped");
                }
            });

            while let Some(result) = tasks.try_join_next() {
                if let Err(e) = result {
                    warn!("Ingestion task failed: {}", e);
                }
            }
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("Ingestion task failed: {}", e);
            }
        }
        info!("Ingestion worker stopped after {} entities", received);
    }
}
