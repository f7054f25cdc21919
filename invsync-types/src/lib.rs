//! Wire-level value types for invsync.
//!
//! This crate defines the plain data exchanged between the reconciliation
//! engine and its collaborators:
//! - Change set and change identifiers (UUID v7)
//! - Changes, change sets and the inventory's apply response
//! - Object state returned by inventory lookups and the lookup parameters
//! - Ingested entities as they arrive from a data source
//!
//! Typed inventory records live in `invsync-model`; here entity payloads are
//! carried as raw JSON so that this crate stays independent of the kinds.

mod change;
mod ids;
mod ingest;
mod state;

pub use change::{Change, ChangeSet, ChangeSetResponse, ChangeType, APPLY_SUCCESS};
pub use ids::{ChangeId, ChangeSetId, IngestionLogId};
pub use ingest::IngestEntity;
pub use state::{LookupParams, ObjectState};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid change type: {0}")]
    InvalidChangeType(String),
}
