//! Enumerated field values accepted by the inventory.

/// Status applied to newly created sites, devices, addresses, prefixes and
/// virtualization objects.
pub const DEFAULT_STATUS: &str = "active";

/// Colour applied to newly created device roles.
pub const DEFAULT_ROLE_COLOR: &str = "000000";

pub const SITE_STATUSES: &[&str] = &["planned", "staging", "active", "decommissioning", "retired"];

pub const DEVICE_STATUSES: &[&str] = &[
    "offline",
    "active",
    "planned",
    "staged",
    "failed",
    "inventory",
    "decommissioning",
];

pub const IP_ADDRESS_STATUSES: &[&str] = &["active", "reserved", "deprecated", "dhcp", "slaac"];

pub const IP_ADDRESS_ROLES: &[&str] = &[
    "loopback", "secondary", "anycast", "vip", "vrrp", "hsrp", "glbp", "carp",
];

pub const PREFIX_STATUSES: &[&str] = &["active", "container", "reserved", "deprecated"];

pub const VIRTUALIZATION_STATUSES: &[&str] = &[
    "offline",
    "active",
    "planned",
    "staged",
    "failed",
    "decommissioning",
];

/// Checks an optional status against `allowed`.
pub(crate) fn check_status(
    object_type: &'static str,
    status: Option<&str>,
    allowed: &[&str],
) -> Result<(), crate::ValidationError> {
    match status {
        Some(value) if !allowed.contains(&value) => Err(crate::ValidationError::InvalidStatus {
            object_type,
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}
