//! DCIM records: sites, manufacturers, platforms, device types, device roles
//! and devices.

use crate::record::{adopt_identity, fill, fill_slug, is_zero, normalise_tags, placeholder_string};
use crate::status::{
    DEFAULT_ROLE_COLOR, DEFAULT_STATUS, DEVICE_STATUSES, SITE_STATUSES, check_status,
};
use crate::{ObjectType, Record, Tag, ValidationError};
use serde::{Deserialize, Serialize};

/// A physical location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Site {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Site {
    const OBJECT_TYPE: ObjectType = ObjectType::Site;

    record_plumbing!(Site);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            slug: placeholder_string(),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), SITE_STATUSES)
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.name);
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.status.get_or_insert_with(|| DEFAULT_STATUS.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.name, &mut self.slug),
            (actual.id, actual.name.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.status, &actual.status);
        fill(&mut self.facility, &actual.facility);
        fill(&mut self.time_zone, &actual.time_zone);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}

/// A hardware or software vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manufacturer {
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

impl Manufacturer {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Manufacturer {
    const OBJECT_TYPE: ObjectType = ObjectType::Manufacturer;

    record_plumbing!(Manufacturer);

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

/// An operating system or firmware family, optionally tied to a vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Box<Manufacturer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Platform {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Platform {
    const OBJECT_TYPE: ObjectType = ObjectType::Platform;

    record_plumbing!(Platform);

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

/// A hardware model. Identified by `model` within its manufacturer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceType {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Box<Manufacturer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl DeviceType {
    #[must_use]
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

impl Record for DeviceType {
    const OBJECT_TYPE: ObjectType = ObjectType::DeviceType;

    record_plumbing!(DeviceType);

    fn natural_key(&self) -> &str {
        &self.model
    }

    fn placeholder() -> Self {
        Self {
            model: placeholder_string(),
            slug: placeholder_string(),
            manufacturer: Some(Box::new(Manufacturer::placeholder())),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.model);
        normalise_tags(&mut self.tags);
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.model, &mut self.slug),
            (actual.id, actual.model.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.part_number, &actual.part_number);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}

/// The functional role of a device (or virtual machine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceRole {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl DeviceRole {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for DeviceRole {
    const OBJECT_TYPE: ObjectType = ObjectType::DeviceRole;

    record_plumbing!(DeviceRole);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            slug: placeholder_string(),
            color: Some(DEFAULT_ROLE_COLOR.to_string()),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.name);
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.color.get_or_insert_with(|| DEFAULT_ROLE_COLOR.to_string());
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.name, &mut self.slug),
            (actual.id, actual.name.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.color, &actual.color);
        fill(&mut self.description, &actual.description);
    }
}

/// A physical device.
///
/// `site`, `device_type` and `role` are required by the inventory and are
/// replaced by placeholders when absent; `platform` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Box<Site>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<Box<DeviceType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Box<DeviceRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Box<Platform>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Device {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Device {
    const OBJECT_TYPE: ObjectType = ObjectType::Device;

    record_plumbing!(Device);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            site: Some(Box::new(Site::placeholder())),
            device_type: Some(Box::new(DeviceType::placeholder())),
            role: Some(Box::new(DeviceRole::placeholder())),
            status: Some(DEFAULT_STATUS.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_status(Self::OBJECT_TYPE.as_str(), self.status.as_deref(), DEVICE_STATUSES)
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
        fill(&mut self.serial, &actual.serial);
        fill(&mut self.asset_tag, &actual.asset_tag);
        fill(&mut self.status, &actual.status);
        fill(&mut self.description, &actual.description);
        fill(&mut self.comments, &actual.comments);
    }
}
