//! Diff/patch: merging an intended node with its actual state and deciding
//! whether the inventory needs a change.

use crate::error::{ReconcileError, ReconcileResult};
use crate::path::NodePath;
use crate::reconcile::{NestedVisitor, Reconcile};
use crate::resolve::ResolutionIndex;
use crate::wrapper::{ComparableData, DataWrapper};
use invsync_model::{Entity, Tag};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Hex SHA-256 of the record's canonical JSON encoding.
///
/// Records serialize their fields in declaration order and leave unset
/// fields out, so equal values always hash equal.
pub fn structural_hash(entity: &Entity) -> ReconcileResult<String> {
    hash_of(entity)
}

pub(crate) fn hash_of<T: Serialize + ?Sized>(value: &T) -> ReconcileResult<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Additive tag merge.
///
/// Starts from the actual tags and appends every intended tag whose name is
/// not there yet, using the existing tag when one was resolved and a new one
/// (id `0`) otherwise. Actual tags are never dropped.
#[must_use]
pub fn merge_tags(
    actual: Option<&[Tag]>,
    intended: Option<&[Tag]>,
    index: &ResolutionIndex,
) -> Option<Vec<Tag>> {
    let mut merged: Vec<Tag> = actual.map(<[Tag]>::to_vec).unwrap_or_default();
    for tag in intended.unwrap_or_default() {
        if merged.iter().any(|t| t.name == tag.name) {
            continue;
        }
        match index.tag_by_name(&tag.name) {
            Some(existing) => merged.push(existing.clone()),
            None => merged.push(Tag { id: 0, ..tag.clone() }),
        }
    }
    (!merged.is_empty()).then_some(merged)
}

impl<T: Reconcile> DataWrapper<T> {
    pub(crate) fn patch_at(
        &mut self,
        path: &NodePath,
        index: &ResolutionIndex,
    ) -> ReconcileResult<Vec<Box<dyn ComparableData>>> {
        let actual = match index.actual(path) {
            Some(state) => {
                let record = T::from_entity(state.entity.clone()).ok_or_else(|| {
                    ReconcileError::MalformedState {
                        object_type: T::OBJECT_TYPE,
                        reason: format!(
                            "actual state at {path} is a {}",
                            state.entity.object_type()
                        ),
                    }
                })?;
                Some((record, state.object_change_id))
            }
            None => None,
        };

        let mut merged = match &self.data {
            Some(data) => data.clone(),
            None => {
                return Err(ReconcileError::MalformedState {
                    object_type: T::OBJECT_TYPE,
                    reason: format!("nothing to patch at {path}"),
                });
            }
        };
        let mut baseline = actual.as_ref().map(|(record, _)| record.clone());

        let mut nested = NestedPatch {
            path: path.clone(),
            index,
            reconcile: Vec::new(),
        };
        merged.visit_nested(baseline.as_mut(), &mut nested)?;
        let mut reconcile = nested.reconcile;

        let tags = match &actual {
            None => {
                merged.set_defaults();
                merge_tags(None, merged.tags(), index)
            }
            Some((record, _)) => {
                merged.merge_from_actual(record);
                merge_tags(record.tags(), merged.tags(), index)
            }
        };
        merged.set_tags(tags);

        for tag in merged.tags().unwrap_or_default() {
            if tag.id == 0 {
                reconcile.push(Box::new(DataWrapper::created(tag.clone())));
            }
        }

        self.changed = match &baseline {
            None => true,
            Some(baseline) => hash_of(&merged)? != hash_of(baseline)?,
        };
        self.version = actual.map(|(_, version)| version);
        debug!(
            "{} at {}: {}",
            T::OBJECT_TYPE,
            path,
            match (self.changed, self.version) {
                (false, _) => "unchanged",
                (true, Some(_)) => "update",
                (true, None) => "create",
            }
        );

        self.data = Some(merged);
        if self.changed {
            reconcile.push(Box::new(self.snapshot()));
        }
        Ok(reconcile)
    }
}

/// Patches each nested reference of one node against the index.
struct NestedPatch<'a> {
    path: NodePath,
    index: &'a ResolutionIndex,
    reconcile: Vec<Box<dyn ComparableData>>,
}

impl NestedVisitor for NestedPatch<'_> {
    fn visit<T: Reconcile>(
        &mut self,
        field: &'static str,
        _required: bool,
        slot: &mut Option<Box<T>>,
        baseline: Option<&mut Option<Box<T>>>,
    ) -> ReconcileResult<()> {
        let path = self.path.child(field);
        let actual_ref = baseline
            .as_deref()
            .and_then(Option::as_deref)
            .filter(|record| record.id() > 0)
            .map(T::reference_of);

        let child = self
            .index
            .get(&path)
            .and_then(|r| r.wrapper.as_any().downcast_ref::<DataWrapper<T>>());

        let child = match (child, actual_ref) {
            // Nothing intended here, or only a placeholder: keep what the
            // inventory already references.
            (None, Some(reference)) => return keep_reference(slot, baseline, reference),
            (Some(child), Some(reference)) if child.is_placeholder() => {
                return keep_reference(slot, baseline, reference);
            }
            (None, None) => return Ok(()),
            (Some(child), _) => child,
        };

        let mut child = child.snapshot();
        self.reconcile.extend(child.patch_at(&path, self.index)?);
        let changed = child.changed;
        let Some(merged) = child.into_record() else {
            return Ok(());
        };

        if changed {
            let mut full = merged;
            full.set_tags(None);
            *slot = Some(Box::new(full));
        } else {
            *slot = Some(Box::new(merged.reference_of()));
            if let Some(Some(actual)) = baseline {
                let trimmed = actual.reference_of();
                **actual = trimmed;
            }
        }
        Ok(())
    }
}

fn keep_reference<T: Reconcile>(
    slot: &mut Option<Box<T>>,
    baseline: Option<&mut Option<Box<T>>>,
    reference: T,
) -> ReconcileResult<()> {
    if let Some(actual) = baseline {
        *actual = Some(Box::new(reference.clone()));
    }
    *slot = Some(Box::new(reference));
    Ok(())
}
