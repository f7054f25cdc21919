//! Shared test helpers for engine tests.

#![allow(dead_code)]

use invsync_engine::{InventoryError, InventoryResult, ObjectStateLookup};
use invsync_model::ObjectType;
use invsync_types::{IngestEntity, LookupParams, ObjectState};
use serde_json::Value;
use std::sync::Mutex;

/// Lookup fake answering from a fixed script and recording every query.
#[derive(Default)]
pub struct ScriptedLookup {
    answers: Vec<(ObjectType, LookupParams, ObjectState)>,
    failing: Option<ObjectType>,
    calls: Mutex<Vec<(ObjectType, LookupParams)>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers lookups of `kind` with exactly `params` with `object`, at
    /// version `1`.
    pub fn found(self, kind: ObjectType, params: LookupParams, object: Value) -> Self {
        self.found_at(kind, params, object, 1)
    }

    pub fn found_at(
        mut self,
        kind: ObjectType,
        params: LookupParams,
        object: Value,
        version: u64,
    ) -> Self {
        let object_id = object["id"].as_u64().unwrap();
        self.answers.push((
            kind,
            params,
            ObjectState {
                object_id,
                object_type: kind.as_str().to_string(),
                object_change_id: version,
                object,
            },
        ));
        self
    }

    /// Answers lookups of `kind` with `params` with a raw state.
    pub fn answering(mut self, kind: ObjectType, params: LookupParams, state: ObjectState) -> Self {
        self.answers.push((kind, params, state));
        self
    }

    /// Fails every lookup of `kind` with a transport error.
    pub fn failing_on(mut self, kind: ObjectType) -> Self {
        self.failing = Some(kind);
        self
    }

    pub fn calls(&self) -> Vec<(ObjectType, LookupParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, kind: ObjectType) -> Vec<LookupParams> {
        self.calls()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, params)| params)
            .collect()
    }
}

impl ObjectStateLookup for ScriptedLookup {
    fn retrieve_object_state(
        &self,
        object_type: ObjectType,
        _object_id: u64,
        params: &LookupParams,
    ) -> InventoryResult<Option<ObjectState>> {
        self.calls
            .lock()
            .unwrap()
            .push((object_type, params.clone()));
        if self.failing == Some(object_type) {
            return Err(InventoryError::Transport("connection refused".into()));
        }
        Ok(self
            .answers
            .iter()
            .find(|(kind, p, _)| *kind == object_type && p == params)
            .map(|(_, _, state)| state.clone()))
    }
}

pub fn entity(data_type: &str, entity: Value) -> IngestEntity {
    IngestEntity::new("req-1", data_type, entity)
}

pub fn params(pairs: &[(&str, &str)]) -> LookupParams {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}
