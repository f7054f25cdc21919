//! IPAM records: IP addresses and prefixes.

use crate::record::{fill, is_zero, normalise_tags, placeholder_string};
use crate::status::{
    DEFAULT_STATUS, IP_ADDRESS_ROLES, IP_ADDRESS_STATUSES, PREFIX_STATUSES, check_status,
};
use crate::{Interface, ObjectType, Record, Site, Tag, ValidationError};
use serde::{Deserialize, Serialize};

/// The object an IP address is assigned to.
///
/// Serialized as `{"interface": {...}}`. Interfaces are the only assignable
/// kind today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignedObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<Box<Interface>>,
}

impl AssignedObject {
    #[must_use]
    pub fn interface(interface: Interface) -> Self {
        Self {
            interface: Some(Box::new(interface)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interface.is_none()
    }
}

/// An IP address with prefix length, e.g. `192.168.0.1/22`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpAddress {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_object: Option<AssignedObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl IpAddress {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// The assigned interface, if any.
    #[must_use]
    pub fn interface(&self) -> Option<&Interface> {
        self.assigned_object
            .as_ref()
            .and_then(|a| a.interface.as_deref())
    }
}

impl Record for IpAddress {
    const OBJECT_TYPE: ObjectType = ObjectType::IpAddress;

    record_plumbing!(IpAddress);

    fn natural_key(&self) -> &str {
        &self.address
    }

    fn placeholder() -> Self {
        Self {
            address: placeholder_string(),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), IP_ADDRESS_STATUSES)?;
        match self.role.as_deref() {
            Some(role) if !IP_ADDRESS_ROLES.contains(&role) => {
                Err(ValidationError::InvalidIpAddressRole(role.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn normalise(&mut self) {
        if self.assigned_object.as_ref().is_some_and(AssignedObject::is_empty) {
            self.assigned_object = None;
        }
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.status.get_or_insert_with(|| DEFAULT_STATUS.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.address.is_empty() {
            self.address.clone_from(&actual.address);
        }
        fill(&mut self.status, &actual.status);
        fill(&mut self.role, &actual.role);
        fill(&mut self.dns_name, &actual.dns_name);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}

/// An IP prefix, e.g. `10.0.0.0/8`, scoped to a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefix {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Box<Site>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_utilized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Prefix {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

impl Record for Prefix {
    const OBJECT_TYPE: ObjectType = ObjectType::Prefix;

    record_plumbing!(Prefix);

    fn natural_key(&self) -> &str {
        &self.prefix
    }

    fn placeholder() -> Self {
        Self {
            prefix: placeholder_string(),
            site: Some(Box::new(Site::placeholder())),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), PREFIX_STATUSES)
    }

    fn normalise(&mut self) {
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.status.get_or_insert_with(|| DEFAULT_STATUS.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.prefix.is_empty() {
            self.prefix.clone_from(&actual.prefix);
        }
        fill(&mut self.status, &actual.status);
        fill(&mut self.is_pool, &actual.is_pool);
        fill(&mut self.mark_utilized, &actual.mark_utilized);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}
