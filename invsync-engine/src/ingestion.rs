//! Ingestion logs and the per-request processor.

use crate::collaborator::{ChangeSetApplier, ObjectStateLookup};
use crate::reconciler::Reconciler;
use invsync_types::{ChangeSet, IngestEntity, IngestionLogId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Where an ingested entity stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionState {
    /// Received; a change set may be planned but nothing was applied.
    New,
    /// The change set was applied.
    Reconciled,
    Failed,
    /// The inventory already matches the entity.
    NoChanges,
}

impl IngestionState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reconciled => "reconciled",
            Self::Failed => "failed",
            Self::NoChanges => "no_changes",
        }
    }
}

impl fmt::Display for IngestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one entity's trip through the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionLog {
    pub id: IngestionLogId,
    pub request_id: String,
    pub data_type: String,
    pub entity: serde_json::Value,
    pub state: IngestionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_set: Option<ChangeSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestionLog {
    /// A fresh log in state [`IngestionState::New`].
    #[must_use]
    pub fn new(entity: &IngestEntity) -> Self {
        Self {
            id: IngestionLogId::new(),
            request_id: entity.request_id.clone(),
            data_type: entity.data_type.clone(),
            entity: entity.entity.clone(),
            state: IngestionState::New,
            change_set: None,
            error: None,
        }
    }

    #[must_use]
    pub fn planned(mut self, change_set: ChangeSet) -> Self {
        self.change_set = Some(change_set);
        self
    }

    #[must_use]
    pub fn reconciled(mut self, change_set: ChangeSet) -> Self {
        self.change_set = Some(change_set);
        self.state = IngestionState::Reconciled;
        self
    }

    #[must_use]
    pub fn no_changes(mut self) -> Self {
        self.state = IngestionState::NoChanges;
        self
    }

    #[must_use]
    pub fn failed(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self.state = IngestionState::Failed;
        self
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.state == IngestionState::Failed
    }
}

/// Reconciles the entities of ingest requests against one inventory.
#[derive(Clone)]
pub struct IngestionProcessor {
    reconciler: Reconciler,
    lookup: Arc<dyn ObjectStateLookup>,
    applier: Arc<dyn ChangeSetApplier>,
}

impl IngestionProcessor {
    #[must_use]
    pub fn new(
        reconciler: Reconciler,
        lookup: Arc<dyn ObjectStateLookup>,
        applier: Arc<dyn ChangeSetApplier>,
    ) -> Self {
        Self {
            reconciler,
            lookup,
            applier,
        }
    }

    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn process_entity(&self, entity: &IngestEntity) -> IngestionLog {
        self.reconciler
            .reconcile(entity, self.lookup.as_ref(), self.applier.as_ref())
    }

    /// Reconciles every entity of a request in order. A failing entity is
    /// recorded in its log and does not stop the rest.
    pub fn process_request(&self, entities: &[IngestEntity]) -> Vec<IngestionLog> {
        let logs: Vec<IngestionLog> = entities.iter().map(|e| self.process_entity(e)).collect();
        let failed = logs.iter().filter(|log| log.is_failed()).count();
        info!(
            "Processed {} entities ({} failed)",
            logs.len(),
            failed
        );
        logs
    }
}

impl fmt::Debug for IngestionProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionProcessor")
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}
