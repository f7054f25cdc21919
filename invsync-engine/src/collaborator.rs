//! Interfaces to the inventory system.
//!
//! The engine calls both collaborators synchronously. Timeouts, retries and
//! cancellation are the implementor's business.

use crate::error::InventoryResult;
use invsync_model::ObjectType;
use invsync_types::{ChangeSet, ChangeSetResponse, LookupParams, ObjectState};
use std::sync::Arc;

/// Fetches the inventory's current state of one object.
pub trait ObjectStateLookup: Send + Sync {
    /// Looks up an object of `object_type`, by `object_id` when it is
    /// non-zero and by `params` otherwise. `Ok(None)` means not found.
    fn retrieve_object_state(
        &self,
        object_type: ObjectType,
        object_id: u64,
        params: &LookupParams,
    ) -> InventoryResult<Option<ObjectState>>;
}

/// Applies a change set to the inventory as one unit.
pub trait ChangeSetApplier: Send + Sync {
    /// Either every change lands or the response reports failure.
    fn apply_change_set(&self, change_set: &ChangeSet) -> InventoryResult<ChangeSetResponse>;
}

impl<L: ObjectStateLookup + ?Sized> ObjectStateLookup for Arc<L> {
    fn retrieve_object_state(
        &self,
        object_type: ObjectType,
        object_id: u64,
        params: &LookupParams,
    ) -> InventoryResult<Option<ObjectState>> {
        (**self).retrieve_object_state(object_type, object_id, params)
    }
}

impl<A: ChangeSetApplier + ?Sized> ChangeSetApplier for Arc<A> {
    fn apply_change_set(&self, change_set: &ChangeSet) -> InventoryResult<ChangeSetResponse> {
        (**self).apply_change_set(change_set)
    }
}
