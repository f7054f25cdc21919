//! Changes and change sets.
//!
//! A change set is the unit handed to the apply collaborator. Its changes are
//! ordered so that applying them in list order never references an object
//! that has not been created or confirmed yet.

use crate::{ChangeId, ChangeSetId, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result string the inventory reports for an applied change set.
pub const APPLY_SUCCESS: &str = "success";

/// Kind of mutation a change performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Update,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            other => Err(Error::InvalidChangeType(other.to_string())),
        }
    }
}

/// One mutation of one inventory object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub change_id: ChangeId,
    pub change_type: ChangeType,
    /// Type tag of the target object, e.g. `dcim.device`.
    pub object_type: String,
    /// Target row; set only for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u64>,
    /// Optimistic-concurrency token; set only for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_version: Option<u64>,
    /// Payload to write.
    pub data: serde_json::Value,
}

impl Change {
    /// Creates a create change with a fresh identifier.
    #[must_use]
    pub fn create(object_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            change_id: ChangeId::new(),
            change_type: ChangeType::Create,
            object_type: object_type.into(),
            object_id: None,
            object_version: None,
            data,
        }
    }

    /// Creates an update change targeting `object_id` at `object_version`.
    #[must_use]
    pub fn update(
        object_type: impl Into<String>,
        object_id: u64,
        object_version: u64,
        data: serde_json::Value,
    ) -> Self {
        Self {
            change_id: ChangeId::new(),
            change_type: ChangeType::Update,
            object_type: object_type.into(),
            object_id: Some(object_id),
            object_version: Some(object_version),
            data,
        }
    }

    /// Replaces the change identifier.
    #[must_use]
    pub fn with_change_id(mut self, change_id: ChangeId) -> Self {
        self.change_id = change_id;
        self
    }

    #[must_use]
    pub fn is_create(&self) -> bool {
        self.change_type == ChangeType::Create
    }
}

/// An ordered batch of changes applied as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub change_set_id: ChangeSetId,
    #[serde(rename = "change_set", default)]
    pub changes: Vec<Change>,
}

impl ChangeSet {
    /// Creates an empty change set with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(ChangeSetId::new())
    }

    #[must_use]
    pub fn with_id(change_set_id: ChangeSetId) -> Self {
        Self {
            change_set_id,
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Serializes the change set as the apply request body.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The inventory's answer to an apply request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSetResponse {
    pub change_set_id: ChangeSetId,
    pub result: String,
    /// Error details in whatever shape the inventory reports them.
    #[serde(default)]
    pub errors: serde_json::Value,
}

impl ChangeSetResponse {
    /// A successful response for `change_set_id`.
    #[must_use]
    pub fn success(change_set_id: ChangeSetId) -> Self {
        Self {
            change_set_id,
            result: APPLY_SUCCESS.to_string(),
            errors: serde_json::Value::Null,
        }
    }

    /// A failed response carrying `errors`.
    #[must_use]
    pub fn failure(change_set_id: ChangeSetId, errors: serde_json::Value) -> Self {
        Self {
            change_set_id,
            result: "failure".to_string(),
            errors,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == APPLY_SUCCESS
    }
}
