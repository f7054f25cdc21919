//! Reconciler façade: ingested entity in, change set out.

use crate::changeset::{assemble_change_set, dedup_objects_to_reconcile};
use crate::collaborator::{ChangeSetApplier, ObjectStateLookup};
use crate::config::ReconcilerConfig;
use crate::error::{InventoryError, ReconcileError, ReconcileResult};
use crate::ingestion::IngestionLog;
use crate::path::NodePath;
use crate::registry::new_data_wrapper;
use crate::resolve::resolve;
use crate::wrapper::ComparableData;
use invsync_types::{ChangeSet, ChangeSetResponse, IngestEntity};
use tracing::{debug, info, warn};

/// Turns ingested entities into change sets and optionally applies them.
///
/// Holds no state between calls; every call builds fresh wrappers, so one
/// reconciler can serve many threads at once.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    #[must_use]
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Everything that has to change in the inventory for `entity` to hold,
    /// children before the records that reference them.
    pub fn objects_to_reconcile(
        &self,
        entity: &IngestEntity,
        lookup: &dyn ObjectStateLookup,
    ) -> ReconcileResult<Vec<Box<dyn ComparableData>>> {
        let mut wrapper = new_data_wrapper(&entity.data_type)?;
        wrapper.decode(entity.entity.clone())?;
        wrapper.validate()?;
        wrapper.normalise();

        let index = resolve(&mut *wrapper, lookup, self.config.memoize_lookups)?;
        debug!(
            "Resolved {} nodes for {} entity",
            index.len(),
            wrapper.object_type()
        );
        wrapper.patch(&NodePath::root(), &index)
    }

    /// Plans the change set for one entity. An entity already reflected in
    /// the inventory yields an empty change set.
    pub fn prepare(
        &self,
        entity: &IngestEntity,
        lookup: &dyn ObjectStateLookup,
    ) -> ReconcileResult<ChangeSet> {
        let objects = self.objects_to_reconcile(entity, lookup)?;
        let change_set = assemble_change_set(&dedup_objects_to_reconcile(objects)?)?;
        info!(
            "Prepared change set {} with {} changes for {} entity",
            change_set.change_set_id,
            change_set.len(),
            entity.data_type
        );
        Ok(change_set)
    }

    /// Plans one change set for several entities, creating shared records
    /// once. Any failing entity aborts the whole batch.
    pub fn prepare_batch(
        &self,
        entities: &[IngestEntity],
        lookup: &dyn ObjectStateLookup,
    ) -> ReconcileResult<ChangeSet> {
        let mut objects = Vec::new();
        for entity in entities {
            objects.extend(self.objects_to_reconcile(entity, lookup)?);
        }
        let change_set = assemble_change_set(&dedup_objects_to_reconcile(objects)?)?;
        info!(
            "Prepared change set {} with {} changes for {} entities",
            change_set.change_set_id,
            change_set.len(),
            entities.len()
        );
        Ok(change_set)
    }

    /// Hands `change_set` to the inventory. A non-success response is an
    /// error carrying the reported errors.
    pub fn apply(
        &self,
        change_set: &ChangeSet,
        applier: &dyn ChangeSetApplier,
    ) -> ReconcileResult<ChangeSetResponse> {
        let response = applier
            .apply_change_set(change_set)
            .map_err(ReconcileError::Apply)?;
        if !response.is_success() {
            return Err(ReconcileError::Apply(InventoryError::Rejected(
                response.errors.to_string(),
            )));
        }
        info!("Applied change set {}", change_set.change_set_id);
        Ok(response)
    }

    /// Prepares and, unless running dry, applies the change set for one
    /// entity, recording the outcome.
    pub fn reconcile(
        &self,
        entity: &IngestEntity,
        lookup: &dyn ObjectStateLookup,
        applier: &dyn ChangeSetApplier,
    ) -> IngestionLog {
        let log = IngestionLog::new(entity);
        let change_set = match self.prepare(entity, lookup) {
            Ok(change_set) => change_set,
            Err(e) => {
                warn!("Failed to reconcile {} entity: {}", entity.data_type, e);
                return log.failed(&e);
            }
        };
        if change_set.is_empty() {
            return log.no_changes();
        }
        if self.config.dry_run {
            return log.planned(change_set);
        }
        match self.apply(&change_set, applier) {
            Ok(_) => log.reconciled(change_set),
            Err(e) => {
                warn!(
                    "Failed to apply change set {}: {}",
                    change_set.change_set_id, e
                );
                log.planned(change_set).failed(&e)
            }
        }
    }
}
