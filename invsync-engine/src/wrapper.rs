//! The comparable data wrapper: a uniform capability object around one
//! record of any kind.
//!
//! `ComparableData` is the object-safe surface the rest of the engine works
//! with. It is implemented once, by the generic [`DataWrapper`]; per-kind
//! behaviour comes from the record's [`Reconcile`] impl.

use crate::error::{ReconcileError, ReconcileResult};
use crate::path::NodePath;
use crate::reconcile::{NestedVisitor, Reconcile};
use crate::resolve::ResolutionIndex;
use invsync_model::{Entity, ObjectType, Record, Tag, ValidationError};
use invsync_types::LookupParams;
use std::any::Any;
use std::fmt;

/// Capabilities of a wrapped record, independent of its kind.
pub trait ComparableData: fmt::Debug + Send + Sync {
    /// Inventory type tag of the wrapped kind.
    fn object_type(&self) -> ObjectType;

    /// Snapshot of the wrapped record, if any.
    fn data(&self) -> Option<Entity>;

    /// Replaces the wrapped record with `payload` decoded as this kind.
    fn decode(&mut self, payload: serde_json::Value) -> ReconcileResult<()>;

    /// Fails when the top-level record is absent or has no identifying data,
    /// or when kind validation fails. An absent nested record is valid: it
    /// becomes a placeholder.
    fn validate(&self) -> ReconcileResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Cleans the ingested value and marks the wrapper as intended.
    fn normalise(&mut self);

    /// Every reachable nested record plus this one, children first and self
    /// last. Absent required references are replaced by placeholders. The
    /// result is computed once per wrapper.
    fn nested_objects(&mut self) -> ReconcileResult<&[NestedObject]>;

    fn query_params(&self) -> LookupParams;

    /// Replaces each nested reference of this node (at `path`) with the
    /// record resolved for it in `index`, so the reference carries the
    /// inventory's natural key even when only an id was ingested.
    fn adopt_resolved(&mut self, path: &NodePath, index: &ResolutionIndex) -> ReconcileResult<()>;

    /// Inventory row id, `0` when unresolved.
    fn id(&self) -> u64;

    fn is_placeholder(&self) -> bool;

    fn has_parent(&self) -> bool;

    fn is_intended(&self) -> bool;

    /// Whether the last [`patch`](ComparableData::patch) found a difference.
    fn has_changed(&self) -> bool;

    /// Version token of the actual state this wrapper was patched against.
    fn object_version(&self) -> Option<u64>;

    /// Merges this node (at `path`) with its actual state from `index`.
    ///
    /// Returns the records needing reconciliation, children first and this
    /// node last when it changed. Afterwards [`data`](ComparableData::data)
    /// holds the merged record.
    fn patch(
        &mut self,
        path: &NodePath,
        index: &ResolutionIndex,
    ) -> ReconcileResult<Vec<Box<dyn ComparableData>>>;

    fn boxed_clone(&self) -> Box<dyn ComparableData>;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn ComparableData> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// One node of an entity's reference tree.
#[derive(Debug, Clone)]
pub struct NestedObject {
    pub path: NodePath,
    pub wrapper: Box<dyn ComparableData>,
}

/// Generic wrapper holding one record of kind `T` and its reconciliation
/// flags.
#[derive(Debug, Clone)]
pub struct DataWrapper<T> {
    pub(crate) data: Option<T>,
    has_parent: bool,
    intended: bool,
    placeholder: bool,
    pub(crate) changed: bool,
    pub(crate) version: Option<u64>,
    nested: Option<Vec<NestedObject>>,
}

impl<T: Reconcile> DataWrapper<T> {
    /// An empty top-level wrapper.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: None,
            has_parent: false,
            intended: false,
            placeholder: false,
            changed: false,
            version: None,
            nested: None,
        }
    }

    /// A top-level wrapper around `record`.
    #[must_use]
    pub fn from_record(record: T) -> Self {
        Self {
            data: Some(record),
            ..Self::new()
        }
    }

    /// A wrapper for a record reached through a parent's reference.
    pub(crate) fn nested(data: Option<T>, placeholder: bool, intended: bool) -> Self {
        Self {
            data,
            has_parent: true,
            intended,
            placeholder,
            ..Self::new()
        }
    }

    /// A record that must be created as is.
    pub(crate) fn created(record: T) -> Self {
        Self {
            data: Some(record),
            has_parent: true,
            intended: true,
            changed: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn into_record(self) -> Option<T> {
        self.data
    }

    /// A copy without the memoized nested objects.
    pub(crate) fn snapshot(&self) -> Self {
        Self {
            data: self.data.clone(),
            has_parent: self.has_parent,
            intended: self.intended,
            placeholder: self.placeholder,
            changed: self.changed,
            version: self.version,
            nested: None,
        }
    }

    fn missing_identity() -> ReconcileError {
        ValidationError::MissingIdentity {
            object_type: T::OBJECT_TYPE.as_str(),
        }
        .into()
    }

    /// Walks this node and everything below it, placing it at `path`.
    pub(crate) fn walk(&mut self, path: &NodePath) -> ReconcileResult<Vec<NestedObject>> {
        let mut data = match self.data.take() {
            Some(data) if data.has_identity() => data,
            _ if self.has_parent => {
                self.placeholder = true;
                T::placeholder()
            }
            _ => return Err(Self::missing_identity()),
        };
        if self.intended {
            data.normalise();
        }
        data.validate()?;

        let mut walk = NestedWalk::new(path.clone(), self.placeholder, self.intended);
        data.visit_nested(None, &mut walk)?;

        for (i, tag) in data.tags().unwrap_or_default().iter().enumerate() {
            let mut tag_wrapper =
                DataWrapper::<Tag>::nested(Some(tag.clone()), false, self.intended);
            walk.objects.extend(tag_wrapper.walk(&path.tag(i))?);
        }

        self.data = Some(data);
        let mut objects = walk.objects;
        objects.push(NestedObject {
            path: path.clone(),
            wrapper: Box::new(self.snapshot()),
        });
        Ok(objects)
    }
}

impl<T: Reconcile> Default for DataWrapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reconcile> ComparableData for DataWrapper<T> {
    fn object_type(&self) -> ObjectType {
        T::OBJECT_TYPE
    }

    fn data(&self) -> Option<Entity> {
        self.data.clone().map(Record::into_entity)
    }

    fn decode(&mut self, payload: serde_json::Value) -> ReconcileResult<()> {
        let record = serde_json::from_value::<T>(payload).map_err(|source| {
            ReconcileError::Decode {
                object_type: T::OBJECT_TYPE,
                source,
            }
        })?;
        self.data = Some(record);
        self.nested = None;
        Ok(())
    }

    fn validate(&self) -> ReconcileResult<()> {
        match &self.data {
            Some(data) if data.has_identity() => Ok(data.validate()?),
            _ if self.has_parent => Ok(()),
            _ => Err(Self::missing_identity()),
        }
    }

    fn normalise(&mut self) {
        if let Some(data) = self.data.as_mut() {
            data.normalise();
        }
        self.intended = true;
        self.nested = None;
    }

    fn nested_objects(&mut self) -> ReconcileResult<&[NestedObject]> {
        if self.nested.is_none() {
            let objects = self.walk(&NodePath::root())?;
            self.nested = Some(objects);
        }
        Ok(self.nested.as_deref().unwrap_or_default())
    }

    fn query_params(&self) -> LookupParams {
        self.data
            .as_ref()
            .map(Reconcile::query_params)
            .unwrap_or_default()
    }

    fn adopt_resolved(&mut self, path: &NodePath, index: &ResolutionIndex) -> ReconcileResult<()> {
        self.adopt_resolved_at(path, index)
    }

    fn id(&self) -> u64 {
        self.data.as_ref().map_or(0, Record::id)
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    fn has_parent(&self) -> bool {
        self.has_parent
    }

    fn is_intended(&self) -> bool {
        self.intended
    }

    fn has_changed(&self) -> bool {
        self.changed
    }

    fn object_version(&self) -> Option<u64> {
        self.version
    }

    fn patch(
        &mut self,
        path: &NodePath,
        index: &ResolutionIndex,
    ) -> ReconcileResult<Vec<Box<dyn ComparableData>>> {
        self.patch_at(path, index)
    }

    fn boxed_clone(&self) -> Box<dyn ComparableData> {
        Box::new(self.snapshot())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Collects the nested objects below one node.
struct NestedWalk {
    path: NodePath,
    placeholder: bool,
    intended: bool,
    objects: Vec<NestedObject>,
}

impl NestedWalk {
    fn new(path: NodePath, placeholder: bool, intended: bool) -> Self {
        Self {
            path,
            placeholder,
            intended,
            objects: Vec::new(),
        }
    }
}

impl NestedVisitor for NestedWalk {
    fn visit<T: Reconcile>(
        &mut self,
        field: &'static str,
        required: bool,
        slot: &mut Option<Box<T>>,
        _baseline: Option<&mut Option<Box<T>>>,
    ) -> ReconcileResult<()> {
        if slot.as_ref().is_some_and(|record| !record.has_identity()) {
            *slot = None;
        }
        if slot.is_none() && !required {
            return Ok(());
        }

        let mut child =
            DataWrapper::<T>::nested(slot.take().map(|b| *b), self.placeholder, self.intended);
        let objects = child.walk(&self.path.child(field))?;
        *slot = child.into_record().map(Box::new);
        self.objects.extend(objects);
        Ok(())
    }
}
