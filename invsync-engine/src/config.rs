//! Reconciler configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the reconciler and the ingestion worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Plan change sets without applying them.
    pub dry_run: bool,
    /// Issue identical lookups only once per reconciliation pass.
    pub memoize_lookups: bool,
    /// Entities the ingestion worker reconciles at the same time.
    pub max_concurrent_entities: usize,
    /// Capacity of the ingestion worker's channels.
    pub channel_capacity: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            memoize_lookups: true,
            max_concurrent_entities: 4,
            channel_capacity: 100,
        }
    }
}
