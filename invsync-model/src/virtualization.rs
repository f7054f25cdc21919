//! Virtualization records.

use crate::record::{adopt_identity, fill, fill_slug, is_zero, normalise_tags, placeholder_string};
use crate::status::{DEFAULT_STATUS, VIRTUALIZATION_STATUSES, check_status};
use crate::{
    Device, DeviceRole, IpAddress, ObjectType, Platform, Record, Site, Tag, ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterGroup {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for ClusterGroup {
    const OBJECT_TYPE: ObjectType = ObjectType::ClusterGroup;

    record_plumbing!(ClusterGroup);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            slug: placeholder_string(),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.name);
        normalise_tags(&mut self.tags);
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.name, &mut self.slug),
            (actual.id, actual.name.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.description, &actual.description);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterType {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for ClusterType {
    const OBJECT_TYPE: ObjectType = ObjectType::ClusterType;

    record_plumbing!(ClusterType);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            slug: placeholder_string(),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.name);
        normalise_tags(&mut self.tags);
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.name, &mut self.slug),
            (actual.id, actual.name.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.description, &actual.description);
    }
}

/// A virtualization cluster. `cluster_type` is required, group and site
/// are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<Box<ClusterType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Box<ClusterGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Box<Site>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for Cluster {
    const OBJECT_TYPE: ObjectType = ObjectType::Cluster;

    record_plumbing!(Cluster);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            cluster_type: Some(Box::new(ClusterType::placeholder())),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), VIRTUALIZATION_STATUSES)
    }

    fn normalise(&mut self) {
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.status.get_or_insert_with(|| DEFAULT_STATUS.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.name.is_empty() {
            self.name.clone_from(&actual.name);
        }
        fill(&mut self.status, &actual.status);
        fill(&mut self.description, &actual.description);
    }
}

/// A virtual machine. Every reference is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualMachine {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Box<Site>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Box<Cluster>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Box<DeviceRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Box<Device>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Box<Platform>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_ip4: Option<Box<IpAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_ip6: Option<Box<IpAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for VirtualMachine {
    const OBJECT_TYPE: ObjectType = ObjectType::VirtualMachine;

    record_plumbing!(VirtualMachine);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), VIRTUALIZATION_STATUSES)
    }

    fn normalise(&mut self) {
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.status.get_or_insert_with(|| DEFAULT_STATUS.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.name.is_empty() {
            self.name.clone_from(&actual.name);
        }
        fill(&mut self.status, &actual.status);
        fill(&mut self.vcpus, &actual.vcpus);
        fill(&mut self.memory, &actual.memory);
        fill(&mut self.disk, &actual.disk);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}

/// An interface on a virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmInterface {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine: Option<Box<VirtualMachine>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for VmInterface {
    const OBJECT_TYPE: ObjectType = ObjectType::VmInterface;

    record_plumbing!(VmInterface);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            virtual_machine: Some(Box::new(VirtualMachine::placeholder())),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        normalise_tags(&mut self.tags);
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.name.is_empty() {
            self.name.clone_from(&actual.name);
        }
        fill(&mut self.enabled, &actual.enabled);
        fill(&mut self.mtu, &actual.mtu);
        fill(&mut self.mac_address, &actual.mac_address);
        fill(&mut self.description, &actual.description);
    }
}

/// A disk attached to a virtual machine. `size` is in megabytes, `0` when
/// unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualDisk {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine: Option<Box<VirtualMachine>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Record for VirtualDisk {
    const OBJECT_TYPE: ObjectType = ObjectType::VirtualDisk;

    record_plumbing!(VirtualDisk);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            virtual_machine: Some(Box::new(VirtualMachine::placeholder())),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        normalise_tags(&mut self.tags);
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.name.is_empty() {
            self.name.clone_from(&actual.name);
        }
        if self.size == 0 {
            self.size = actual.size;
        }
        fill(&mut self.description, &actual.description);
    }
}
