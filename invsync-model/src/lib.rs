//! Inventory entity model for invsync.
//!
//! Defines the typed records the reconciler works on:
//! - [`ObjectType`]: the closed set of inventory type tags (`dcim.site`, ...)
//! - one plain record per kind ([`Site`], [`Device`], [`IpAddress`], ...)
//! - [`Entity`]: a tagged variant over every record kind
//! - [`Record`]: the per-kind capabilities the engine relies on (identity,
//!   placeholders, normalisation, creation defaults, merging with actual state)
//! - [`ValidationError`]: kind-specific validation failures
//!
//! Records serialize to the inventory's JSON shape: unset identifiers, empty
//! strings and absent optionals are left out of the payload.

#[macro_use]
mod record;

mod dcim;
mod entity;
mod error;
mod extras;
mod interface;
mod ipam;
mod object_type;
mod status;
mod virtualization;

pub use dcim::{Device, DeviceRole, DeviceType, Manufacturer, Platform, Site};
pub use entity::Entity;
pub use error::ValidationError;
pub use extras::Tag;
pub use interface::{Interface, INTERFACE_MODES, INTERFACE_TYPES, DEFAULT_INTERFACE_TYPE};
pub use ipam::{AssignedObject, IpAddress, Prefix};
pub use object_type::ObjectType;
pub use record::{slugify, Record, PLACEHOLDER_NAME};
pub use status::{
    DEFAULT_ROLE_COLOR, DEFAULT_STATUS, DEVICE_STATUSES, IP_ADDRESS_ROLES, IP_ADDRESS_STATUSES,
    PREFIX_STATUSES, SITE_STATUSES, VIRTUALIZATION_STATUSES,
};
pub use virtualization::{
    Cluster, ClusterGroup, ClusterType, VirtualDisk, VirtualMachine, VmInterface,
};
