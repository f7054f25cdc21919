//! Inventory type tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every object kind the reconciler knows how to handle.
///
/// The string form is the inventory's own type tag and is what travels on
/// the wire (`object_type` in changes and lookups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "dcim.site")]
    Site,
    #[serde(rename = "dcim.manufacturer")]
    Manufacturer,
    #[serde(rename = "dcim.platform")]
    Platform,
    #[serde(rename = "dcim.devicetype")]
    DeviceType,
    #[serde(rename = "dcim.devicerole")]
    DeviceRole,
    #[serde(rename = "dcim.device")]
    Device,
    #[serde(rename = "dcim.interface")]
    Interface,
    #[serde(rename = "ipam.ipaddress")]
    IpAddress,
    #[serde(rename = "ipam.prefix")]
    Prefix,
    #[serde(rename = "extras.tag")]
    Tag,
    #[serde(rename = "virtualization.clustergroup")]
    ClusterGroup,
    #[serde(rename = "virtualization.clustertype")]
    ClusterType,
    #[serde(rename = "virtualization.cluster")]
    Cluster,
    #[serde(rename = "virtualization.virtualmachine")]
    VirtualMachine,
    #[serde(rename = "virtualization.vminterface")]
    VmInterface,
    #[serde(rename = "virtualization.virtualdisk")]
    VirtualDisk,
}

impl ObjectType {
    /// All kinds, leaf kinds first.
    pub const ALL: [ObjectType; 16] = [
        Self::Tag,
        Self::Site,
        Self::Manufacturer,
        Self::Platform,
        Self::DeviceType,
        Self::DeviceRole,
        Self::Device,
        Self::Interface,
        Self::Prefix,
        Self::IpAddress,
        Self::ClusterGroup,
        Self::ClusterType,
        Self::Cluster,
        Self::VirtualMachine,
        Self::VmInterface,
        Self::VirtualDisk,
    ];

    /// The inventory type tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "dcim.site",
            Self::Manufacturer => "dcim.manufacturer",
            Self::Platform => "dcim.platform",
            Self::DeviceType => "dcim.devicetype",
            Self::DeviceRole => "dcim.devicerole",
            Self::Device => "dcim.device",
            Self::Interface => "dcim.interface",
            Self::IpAddress => "ipam.ipaddress",
            Self::Prefix => "ipam.prefix",
            Self::Tag => "extras.tag",
            Self::ClusterGroup => "virtualization.clustergroup",
            Self::ClusterType => "virtualization.clustertype",
            Self::Cluster => "virtualization.cluster",
            Self::VirtualMachine => "virtualization.virtualmachine",
            Self::VmInterface => "virtualization.vminterface",
            Self::VirtualDisk => "virtualization.virtualdisk",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
