//! In-process inventory.
//!
//! Implements both collaborator traits over a map of JSON objects. Lookups
//! match `q` against the natural key and every `a__b` param against the
//! nested path `a.b`. Applying a change set is all-or-nothing: changes are
//! applied to a copy of the state, which replaces the live state only when
//! every change succeeded.

use crate::collaborator::{ChangeSetApplier, ObjectStateLookup};
use crate::error::{InventoryError, InventoryResult};
use invsync_model::{Entity, ObjectType};
use invsync_types::{Change, ChangeSet, ChangeSetResponse, ChangeType, LookupParams, ObjectState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// One object of an inventory snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub object_type: ObjectType,
    pub object: Value,
}

#[derive(Debug, Clone)]
struct StoredObject {
    change_id: u64,
    object: Value,
}

#[derive(Debug, Clone, Default)]
struct InventoryState {
    objects: HashMap<ObjectType, BTreeMap<u64, StoredObject>>,
    next_id: u64,
    next_change_id: u64,
}

/// In-memory inventory backing tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    state: Mutex<InventoryState>,
}

impl MemoryInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from snapshot entries. Objects keep their `id`;
    /// objects without one are numbered after the highest id seen.
    pub fn load(entries: Vec<SnapshotEntry>) -> InventoryResult<Self> {
        let inventory = Self::new();
        {
            let mut state = inventory.lock();
            state.next_id = entries
                .iter()
                .filter_map(|e| e.object.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or_default();
            for entry in entries {
                let mut object = entry.object;
                if !object.is_object() {
                    return Err(InventoryError::Protocol(format!(
                        "{} snapshot entry is not an object",
                        entry.object_type
                    )));
                }
                let id = match object.get("id").and_then(Value::as_u64) {
                    Some(id) if id > 0 => id,
                    _ => state.allocate_id(),
                };
                object["id"] = json!(id);
                let change_id = state.allocate_change_id();
                state
                    .objects
                    .entry(entry.object_type)
                    .or_default()
                    .insert(id, StoredObject { change_id, object });
            }
        }
        Ok(inventory)
    }

    /// Every stored object, kinds in dependency order, ids ascending.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let state = self.lock();
        let entries = ObjectType::ALL
            .iter()
            .filter_map(|kind| state.objects.get(kind).map(|objects| (*kind, objects)))
            .flat_map(|(kind, objects)| {
                objects.values().map(move |stored| SnapshotEntry {
                    object_type: kind,
                    object: stored.object.clone(),
                })
            })
            .collect();
        entries
    }

    /// Number of stored objects of `kind`.
    #[must_use]
    pub fn count(&self, kind: ObjectType) -> usize {
        self.lock().objects.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Total number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().objects.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored object of `kind` with `id`.
    #[must_use]
    pub fn get(&self, kind: ObjectType, id: u64) -> Option<Value> {
        self.lock()
            .objects
            .get(&kind)
            .and_then(|objects| objects.get(&id))
            .map(|stored| stored.object.clone())
    }

    fn lock(&self) -> MutexGuard<'_, InventoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStateLookup for MemoryInventory {
    fn retrieve_object_state(
        &self,
        object_type: ObjectType,
        object_id: u64,
        params: &LookupParams,
    ) -> InventoryResult<Option<ObjectState>> {
        let state = self.lock();
        let Some(objects) = state.objects.get(&object_type) else {
            return Ok(None);
        };
        let found = if object_id > 0 {
            objects.get(&object_id).map(|stored| (object_id, stored))
        } else {
            objects
                .iter()
                .find(|(_, stored)| matches_params(object_type, &stored.object, params))
                .map(|(id, stored)| (*id, stored))
        };
        Ok(found.map(|(id, stored)| ObjectState {
            object_id: id,
            object_type: object_type.as_str().to_string(),
            object_change_id: stored.change_id,
            object: stored.object.clone(),
        }))
    }
}

impl ChangeSetApplier for MemoryInventory {
    fn apply_change_set(&self, change_set: &ChangeSet) -> InventoryResult<ChangeSetResponse> {
        let mut live = self.lock();
        let mut staged = live.clone();
        for change in change_set.iter() {
            if let Err(e) = staged.apply(change) {
                warn!(
                    "Change set {} rejected at {} {}: {}",
                    change_set.change_set_id,
                    change.change_type.as_str(),
                    change.object_type,
                    e
                );
                return Ok(ChangeSetResponse::failure(
                    change_set.change_set_id,
                    json!([e.to_string()]),
                ));
            }
        }
        *live = staged;
        debug!(
            "Applied change set {} ({} changes)",
            change_set.change_set_id,
            change_set.len()
        );
        Ok(ChangeSetResponse::success(change_set.change_set_id))
    }
}

impl InventoryState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn allocate_change_id(&mut self) -> u64 {
        self.next_change_id += 1;
        self.next_change_id
    }

    fn apply(&mut self, change: &Change) -> InventoryResult<()> {
        let kind = change
            .object_type
            .parse::<ObjectType>()
            .map_err(InventoryError::Rejected)?;
        let Value::Object(mut data) = change.data.clone() else {
            return Err(InventoryError::Rejected(format!(
                "{kind} change data is not an object"
            )));
        };
        self.resolve_references(kind, &mut data)?;

        match change.change_type {
            ChangeType::Create => self.create(kind, data),
            ChangeType::Update => {
                let id = change.object_id.ok_or_else(|| {
                    InventoryError::Rejected(format!("{kind} update without object id"))
                })?;
                self.update(kind, id, change.object_version, data)
            }
        }
    }

    fn create(&mut self, kind: ObjectType, mut data: Map<String, Value>) -> InventoryResult<()> {
        data.remove("id");
        let object = Value::Object(data);
        let key = natural_key(kind, &object)?;
        let duplicate = self.objects.get(&kind).is_some_and(|objects| {
            objects
                .values()
                .any(|stored| same_identity(kind, &stored.object, &object))
        });
        if duplicate {
            return Err(InventoryError::Rejected(format!(
                "{kind} {key} already exists"
            )));
        }

        let id = self.allocate_id();
        let change_id = self.allocate_change_id();
        let mut object = object;
        object["id"] = json!(id);
        self.objects
            .entry(kind)
            .or_default()
            .insert(id, StoredObject { change_id, object });
        Ok(())
    }

    fn update(
        &mut self,
        kind: ObjectType,
        id: u64,
        version: Option<u64>,
        data: Map<String, Value>,
    ) -> InventoryResult<()> {
        let change_id = self.allocate_change_id();
        let stored = self
            .objects
            .get_mut(&kind)
            .and_then(|objects| objects.get_mut(&id))
            .ok_or_else(|| InventoryError::NotFound(format!("{kind} {id}")))?;
        if let Some(version) = version
            && version != stored.change_id
        {
            return Err(InventoryError::Rejected(format!(
                "{kind} {id} is at version {}, change expects {version}",
                stored.change_id
            )));
        }
        if let Value::Object(fields) = &mut stored.object {
            for (field, value) in data {
                if field != "id" {
                    fields.insert(field, value);
                }
            }
        }
        stored.change_id = change_id;
        Ok(())
    }

    /// Replaces every reference carried by value with the stored object it
    /// names.
    fn resolve_references(
        &self,
        kind: ObjectType,
        data: &mut Map<String, Value>,
    ) -> InventoryResult<()> {
        for (field, target) in reference_fields(kind) {
            let slot = match *field {
                "assigned_object.interface" => data
                    .get_mut("assigned_object")
                    .and_then(|assigned| assigned.get_mut("interface")),
                field => data.get_mut(field),
            };
            if let Some(slot) = slot
                && slot.is_object()
            {
                *slot = self.find_reference(*target, slot)?.clone();
            }
        }

        if let Some(Value::Array(tags)) = data.get_mut("tags") {
            for tag in tags.iter_mut() {
                *tag = self.find_reference(ObjectType::Tag, tag)?.clone();
            }
        }
        Ok(())
    }

    fn find_reference(&self, kind: ObjectType, reference: &Value) -> InventoryResult<&Value> {
        self.objects
            .get(&kind)
            .and_then(|objects| {
                objects
                    .values()
                    .map(|stored| &stored.object)
                    .find(|stored| self.matches_reference(kind, stored, reference))
            })
            .ok_or_else(|| InventoryError::NotFound(format!("{kind} {reference}")))
    }

    /// A reference matches by id when it has one, otherwise by natural key
    /// and by the references it carries itself.
    fn matches_reference(&self, kind: ObjectType, stored: &Value, reference: &Value) -> bool {
        if let Some(id) = reference.get("id").and_then(Value::as_u64)
            && id > 0
        {
            return stored.get("id").and_then(Value::as_u64) == Some(id);
        }
        let (Ok(key), Ok(stored_key)) = (natural_key(kind, reference), natural_key(kind, stored))
        else {
            return false;
        };
        if key != stored_key {
            return false;
        }
        reference_fields(kind).iter().all(|(field, target)| {
            match (lookup_path(reference, field), lookup_path(stored, field)) {
                (Some(nested), Some(stored_nested)) if nested.is_object() => {
                    self.matches_reference(*target, stored_nested, nested)
                }
                (Some(nested), None) => !nested.is_object(),
                _ => true,
            }
        })
    }
}

/// Object-valued fields of each kind and the kind they point at.
fn reference_fields(kind: ObjectType) -> &'static [(&'static str, ObjectType)] {
    match kind {
        ObjectType::Platform | ObjectType::DeviceType => {
            &[("manufacturer", ObjectType::Manufacturer)]
        }
        ObjectType::Device => &[
            ("site", ObjectType::Site),
            ("device_type", ObjectType::DeviceType),
            ("role", ObjectType::DeviceRole),
            ("platform", ObjectType::Platform),
        ],
        ObjectType::Interface => &[("device", ObjectType::Device)],
        ObjectType::IpAddress => &[("assigned_object.interface", ObjectType::Interface)],
        ObjectType::Prefix => &[("site", ObjectType::Site)],
        ObjectType::Cluster => &[
            ("type", ObjectType::ClusterType),
            ("group", ObjectType::ClusterGroup),
            ("site", ObjectType::Site),
        ],
        ObjectType::VirtualMachine => &[
            ("site", ObjectType::Site),
            ("cluster", ObjectType::Cluster),
            ("role", ObjectType::DeviceRole),
            ("device", ObjectType::Device),
            ("platform", ObjectType::Platform),
            ("primary_ip4", ObjectType::IpAddress),
            ("primary_ip6", ObjectType::IpAddress),
        ],
        ObjectType::VmInterface | ObjectType::VirtualDisk => {
            &[("virtual_machine", ObjectType::VirtualMachine)]
        }
        ObjectType::Site
        | ObjectType::Manufacturer
        | ObjectType::DeviceRole
        | ObjectType::Tag
        | ObjectType::ClusterGroup
        | ObjectType::ClusterType => &[],
    }
}

fn natural_key(kind: ObjectType, object: &Value) -> InventoryResult<String> {
    let entity = Entity::decode(kind, object.clone())?;
    Ok(entity.natural_key().to_string())
}

/// Two objects collide when they share a natural key and point at the same
/// parents.
fn same_identity(kind: ObjectType, a: &Value, b: &Value) -> bool {
    let same_key = matches!(
        (natural_key(kind, a), natural_key(kind, b)),
        (Ok(x), Ok(y)) if x == y
    );
    same_key
        && reference_fields(kind).iter().all(|(field, _)| {
            let id = |v: &Value| {
                lookup_path(v, field)
                    .and_then(|r| r.get("id"))
                    .and_then(Value::as_u64)
            };
            id(a) == id(b)
        })
}

fn lookup_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(value, |v, segment| v.get(segment))
}

/// Follows `device__site__name` style params. `interface` on an IP address
/// goes through its assigned object.
fn lookup_param<'v>(kind: ObjectType, object: &'v Value, param: &str) -> Option<&'v Value> {
    let mut segments = param.split("__");
    let mut current = match segments.next()? {
        "interface" if kind == ObjectType::IpAddress => {
            object.get("assigned_object")?.get("interface")?
        }
        first => object.get(first)?,
    };
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current)
}

fn matches_params(kind: ObjectType, object: &Value, params: &LookupParams) -> bool {
    params.iter().all(|(param, expected)| match param {
        "q" => natural_key(kind, object).is_ok_and(|key| key == expected),
        param => lookup_param(kind, object, param).and_then(Value::as_str) == Some(expected),
    })
}
