//! Validation errors for inventory records.

use thiserror::Error;

/// Reasons a record is rejected before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record carries none of its identifying fields.
    #[error("{object_type}: entity has no identifying data")]
    MissingIdentity { object_type: &'static str },

    /// A status outside the kind's enumerated set.
    #[error("{object_type}: invalid status {value:?}")]
    InvalidStatus {
        object_type: &'static str,
        value: String,
    },

    #[error("invalid IP address role {0:?}")]
    InvalidIpAddressRole(String),

    #[error("invalid interface type {0:?}")]
    InvalidInterfaceType(String),

    #[error("invalid interface mode {0:?}")]
    InvalidInterfaceMode(String),
}
