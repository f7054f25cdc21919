//! Error types for the reconciliation engine and its collaborators.

use invsync_model::{ObjectType, ValidationError};
use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that abort the reconciliation of one entity.
///
/// No partial change set is ever produced alongside one of these.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The ingested entity has no identifying data or fails kind validation.
    #[error("invalid entity: {0}")]
    InvalidEntity(#[from] ValidationError),

    /// No wrapper is registered for the type tag.
    #[error("unsupported data type {0}")]
    UnsupportedDataType(String),

    /// The ingested payload does not decode as its declared kind.
    #[error("failed to decode {object_type} entity: {source}")]
    Decode {
        object_type: ObjectType,
        source: serde_json::Error,
    },

    /// The lookup collaborator failed.
    #[error("failed to retrieve {object_type} state: {source}")]
    Lookup {
        object_type: ObjectType,
        source: InventoryError,
    },

    /// The lookup collaborator answered with state the engine cannot use.
    #[error("malformed {object_type} state: {reason}")]
    MalformedState {
        object_type: ObjectType,
        reason: String,
    },

    /// The apply collaborator failed or rejected the change set.
    #[error("failed to apply change set: {0}")]
    Apply(InventoryError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for collaborator calls.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors reported by the inventory collaborators.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Transport-level failure talking to the inventory.
    #[error("transport error: {0}")]
    Transport(String),

    /// The inventory refused the change set.
    #[error("change set rejected: {0}")]
    Rejected(String),

    /// A change references an object the inventory does not know.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The inventory answered with something unexpected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
