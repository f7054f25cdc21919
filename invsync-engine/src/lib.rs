//! Reconciliation engine for invsync.
//!
//! Takes one ingested inventory entity (a device, an IP address, ...) with its
//! nested references and works out the ordered set of creates and updates
//! that make the inventory match it.
//!
//! # Architecture
//!
//! - **Wrapper**: [`ComparableData`], implemented once by [`DataWrapper`] for
//!   every record kind, walks an entity's reference tree and synthesizes
//!   placeholders for required references that were left out
//! - **Registry**: [`new_data_wrapper`] maps a type tag to its wrapper
//! - **Resolution**: [`resolve`] fetches the actual state of every node,
//!   children first, through an [`ObjectStateLookup`]
//! - **Patch**: merges intended and actual state per node, decides by
//!   [`structural_hash`] whether the node changed and trims unchanged
//!   references down to their id
//! - **Assembly**: [`assemble_change_set`] turns the reconcile list into a
//!   [`ChangeSet`](invsync_types::ChangeSet)
//!
//! [`Reconciler`] ties these together; [`IngestionProcessor`] and
//! [`IngestionWorker`] run it over requests and channels.
//!
//! # Example
//!
//! ```
//! use invsync_engine::{MemoryInventory, Reconciler};
//! use invsync_types::IngestEntity;
//! use serde_json::json;
//!
//! let inventory = MemoryInventory::new();
//! let reconciler = Reconciler::default();
//!
//! let entity = IngestEntity::new("req-1", "dcim.site", json!({"name": "Site A"}));
//! let change_set = reconciler.prepare(&entity, &inventory).unwrap();
//! assert_eq!(change_set.len(), 1);
//! ```

mod changeset;
mod collaborator;
mod config;
mod error;
mod ingestion;
mod memory;
mod patch;
mod path;
mod reconcile;
mod reconciler;
mod registry;
mod resolve;
mod worker;
mod wrapper;

pub use changeset::{assemble_change_set, dedup_objects_to_reconcile};
pub use collaborator::{ChangeSetApplier, ObjectStateLookup};
pub use config::ReconcilerConfig;
pub use error::{InventoryError, InventoryResult, ReconcileError, ReconcileResult};
pub use ingestion::{IngestionLog, IngestionProcessor, IngestionState};
pub use memory::{MemoryInventory, SnapshotEntry};
pub use patch::{merge_tags, structural_hash};
pub use path::NodePath;
pub use reconcile::{NestedVisitor, Reconcile};
pub use reconciler::Reconciler;
pub use registry::{new_data_wrapper, wrapper_for};
pub use resolve::{resolve, ActualState, Resolution, ResolutionIndex};
pub use worker::IngestionWorker;
pub use wrapper::{ComparableData, DataWrapper, NestedObject};
