//! Resolution: fetching the inventory's actual state for every node of an
//! entity's reference tree.

use crate::collaborator::ObjectStateLookup;
use crate::error::{ReconcileError, ReconcileResult};
use crate::path::NodePath;
use crate::reconcile::{NestedVisitor, Reconcile};
use crate::registry::wrapper_for;
use crate::wrapper::{ComparableData, DataWrapper, NestedObject};
use invsync_model::{Entity, ObjectType, Record, Tag};
use invsync_types::LookupParams;
use std::collections::HashMap;
use tracing::debug;

/// The inventory's current version of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualState {
    pub entity: Entity,
    pub object_id: u64,
    pub object_change_id: u64,
}

/// One resolved node: the intended wrapper and what the inventory holds.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub wrapper: Box<dyn ComparableData>,
    pub actual: Option<ActualState>,
}

/// Resolved nodes of one entity, keyed by their position in its tree.
#[derive(Debug, Clone, Default)]
pub struct ResolutionIndex {
    nodes: HashMap<NodePath, Resolution>,
    tags_by_name: HashMap<String, Tag>,
}

impl ResolutionIndex {
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&Resolution> {
        self.nodes.get(path)
    }

    /// Actual state of the node at `path`, if the inventory has one.
    #[must_use]
    pub fn actual(&self, path: &NodePath) -> Option<&ActualState> {
        self.nodes.get(path).and_then(|r| r.actual.as_ref())
    }

    /// An existing tag resolved anywhere in this entity.
    #[must_use]
    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags_by_name.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, path: NodePath, resolution: Resolution) {
        if let Some(actual) = &resolution.actual
            && let Some(tag) = Tag::from_entity(actual.entity.clone())
        {
            self.tags_by_name.insert(tag.name.clone(), tag);
        }
        self.nodes.insert(path, resolution);
    }
}

type LookupKey = (ObjectType, u64, LookupParams);

/// Resolves every node of `root`, children before parents.
///
/// Each parent takes the identity resolved for its children before it is
/// looked up itself. With `memoize` set, identical lookups within this pass
/// are issued once. Any lookup failure aborts the whole resolution.
pub fn resolve(
    root: &mut dyn ComparableData,
    lookup: &dyn ObjectStateLookup,
    memoize: bool,
) -> ReconcileResult<ResolutionIndex> {
    let nodes = root.nested_objects()?.to_vec();
    let mut memo: HashMap<LookupKey, Option<ActualState>> = HashMap::new();
    let mut index = ResolutionIndex::default();

    for NestedObject { path, mut wrapper } in nodes {
        wrapper.adopt_resolved(&path, &index)?;
        let key = (wrapper.object_type(), wrapper.id(), wrapper.query_params());
        let cached = if memoize { memo.get(&key).cloned() } else { None };
        let actual = match cached {
            Some(hit) => hit,
            None => {
                let actual = retrieve(lookup, &key)?;
                if memoize {
                    memo.insert(key, actual.clone());
                }
                actual
            }
        };
        index.insert(path, Resolution { wrapper, actual });
    }

    Ok(index)
}

impl<T: Reconcile> DataWrapper<T> {
    pub(crate) fn adopt_resolved_at(
        &mut self,
        path: &NodePath,
        index: &ResolutionIndex,
    ) -> ReconcileResult<()> {
        let Some(data) = self.data.as_mut() else {
            return Ok(());
        };
        data.visit_nested(None, &mut AdoptResolved { path, index })
    }
}

/// Swaps each nested reference for its resolved record.
struct AdoptResolved<'a> {
    path: &'a NodePath,
    index: &'a ResolutionIndex,
}

impl NestedVisitor for AdoptResolved<'_> {
    fn visit<T: Reconcile>(
        &mut self,
        field: &'static str,
        _required: bool,
        slot: &mut Option<Box<T>>,
        _baseline: Option<&mut Option<Box<T>>>,
    ) -> ReconcileResult<()> {
        let Some(resolution) = self.index.get(&self.path.child(field)) else {
            return Ok(());
        };
        let Some(mut record) = resolution
            .wrapper
            .as_any()
            .downcast_ref::<DataWrapper<T>>()
            .and_then(DataWrapper::record)
            .cloned()
        else {
            return Ok(());
        };
        if let Some(actual) = resolution
            .actual
            .as_ref()
            .and_then(|state| T::from_entity(state.entity.clone()))
        {
            record.merge_from_actual(&actual);
        }
        *slot = Some(Box::new(record));
        Ok(())
    }
}

fn retrieve(
    lookup: &dyn ObjectStateLookup,
    (object_type, object_id, params): &LookupKey,
) -> ReconcileResult<Option<ActualState>> {
    let object_type = *object_type;
    debug!("Looking up {} with {}", object_type, params);

    let state = lookup
        .retrieve_object_state(object_type, *object_id, params)
        .map_err(|source| ReconcileError::Lookup {
            object_type,
            source,
        })?;
    let Some(state) = state else {
        debug!("{} not found", object_type);
        return Ok(None);
    };
    if state.object.is_null() {
        return Ok(None);
    }
    if !state.object_type.is_empty() && state.object_type != object_type.as_str() {
        return Err(ReconcileError::MalformedState {
            object_type,
            reason: format!("lookup answered with {}", state.object_type),
        });
    }

    let mut decoder = wrapper_for(object_type);
    decoder
        .decode(state.object)
        .map_err(|e| ReconcileError::MalformedState {
            object_type,
            reason: e.to_string(),
        })?;
    let Some(mut entity) = decoder.data() else {
        return Ok(None);
    };
    if entity.id() == 0 {
        entity.set_id(state.object_id);
    }
    if entity.id() == 0 {
        return Err(ReconcileError::MalformedState {
            object_type,
            reason: "object has no id".to_string(),
        });
    }

    debug!("Found {} {}", object_type, entity.id());
    Ok(Some(ActualState {
        object_id: entity.id(),
        object_change_id: state.object_change_id,
        entity,
    }))
}
