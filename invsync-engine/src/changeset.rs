//! Change-set assembly.

use crate::error::ReconcileResult;
use crate::patch::structural_hash;
use crate::wrapper::ComparableData;
use invsync_types::{Change, ChangeId, ChangeSet};
use std::collections::HashSet;

/// Drops records structurally identical to an earlier one of the same kind,
/// keeping the first occurrence and the original order.
pub fn dedup_objects_to_reconcile(
    objects: Vec<Box<dyn ComparableData>>,
) -> ReconcileResult<Vec<Box<dyn ComparableData>>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(objects.len());
    for object in objects {
        let Some(entity) = object.data() else {
            continue;
        };
        if seen.insert((object.object_type(), structural_hash(&entity)?)) {
            unique.push(object);
        }
    }
    Ok(unique)
}

/// Packages reconciled records into a change set, preserving their order.
///
/// Records with an id become updates, the rest creates. The last change
/// reuses the change set id as its change id.
pub fn assemble_change_set(objects: &[Box<dyn ComparableData>]) -> ReconcileResult<ChangeSet> {
    let mut change_set = ChangeSet::new();
    let last = objects.len().saturating_sub(1);
    for (i, object) in objects.iter().enumerate() {
        let Some(entity) = object.data() else {
            continue;
        };
        let object_type = object.object_type();
        let data = entity.to_value()?;
        let change = match entity.id() {
            0 => Change::create(object_type.as_str(), data),
            id => Change::update(
                object_type.as_str(),
                id,
                object.object_version().unwrap_or_default(),
                data,
            ),
        };
        let change = if i == last {
            change.with_change_id(ChangeId::from(change_set.change_set_id))
        } else {
            change
        };
        change_set.push(change);
    }
    Ok(change_set)
}
