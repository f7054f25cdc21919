//! Entities as delivered by a data source.

use serde::{Deserialize, Serialize};

/// One top-level entity to reconcile.
///
/// Delivery is at-least-once, so the same entity may arrive more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestEntity {
    /// Identifier of the ingest request this entity belongs to.
    #[serde(default)]
    pub request_id: String,
    /// Type tag of the entity, e.g. `dcim.device`.
    pub data_type: String,
    /// The entity payload.
    pub entity: serde_json::Value,
}

impl IngestEntity {
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        data_type: impl Into<String>,
        entity: serde_json::Value,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            data_type: data_type.into(),
            entity,
        }
    }

    /// Decodes a JSON document into an ingest entity.
    pub fn from_json(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
