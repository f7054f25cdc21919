//! Device interfaces.

use crate::record::{fill, is_zero, normalise_tags, placeholder_string};
use crate::{Device, ObjectType, Record, Tag, ValidationError};
use serde::{Deserialize, Serialize};

/// Interface type applied on creation when none is given.
pub const DEFAULT_INTERFACE_TYPE: &str = "other";

/// Interface types the inventory accepts.
pub const INTERFACE_TYPES: &[&str] = &[
    // virtual
    "virtual",
    "bridge",
    "lag",
    // ethernet, fixed
    "100base-fx",
    "100base-lfx",
    "100base-tx",
    "100base-t1",
    "1000base-t",
    "2.5gbase-t",
    "5gbase-t",
    "10gbase-t",
    "10gbase-cx4",
    // ethernet, modular
    "1000base-x-gbic",
    "1000base-x-sfp",
    "10gbase-x-sfpp",
    "10gbase-x-xfp",
    "10gbase-x-xenpak",
    "10gbase-x-x2",
    "25gbase-x-sfp28",
    "50gbase-x-sfp56",
    "40gbase-x-qsfpp",
    "50gbase-x-sfp28",
    "100gbase-x-cfp",
    "100gbase-x-cfp2",
    "100gbase-x-cfp4",
    "100gbase-x-cxp",
    "100gbase-x-cpak",
    "100gbase-x-dsfp",
    "100gbase-x-sfpdd",
    "100gbase-x-qsfp28",
    "100gbase-x-qsfpdd",
    "200gbase-x-cfp2",
    "200gbase-x-qsfp56",
    "200gbase-x-qsfpdd",
    "400gbase-x-cfp2",
    "400gbase-x-qsfp112",
    "400gbase-x-qsfpdd",
    "400gbase-x-osfp",
    "400gbase-x-osfp-rhs",
    "400gbase-x-cdfp",
    "400gbase-x-cfp8",
    "800gbase-x-qsfpdd",
    "800gbase-x-osfp",
    // ethernet, backplane
    "1000base-kx",
    "10gbase-kr",
    "10gbase-kx4",
    "25gbase-kr",
    "40gbase-kr4",
    "50gbase-kr",
    "100gbase-kp4",
    "100gbase-kr2",
    "100gbase-kr4",
    // wireless
    "ieee802.11a",
    "ieee802.11g",
    "ieee802.11n",
    "ieee802.11ac",
    "ieee802.11ad",
    "ieee802.11ax",
    "ieee802.11ay",
    "ieee802.15.1",
    "other-wireless",
    // cellular
    "gsm",
    "cdma",
    "lte",
    // SONET
    "sonet-oc3",
    "sonet-oc12",
    "sonet-oc48",
    "sonet-oc192",
    "sonet-oc768",
    "sonet-oc1920",
    "sonet-oc3840",
    // fibre channel
    "1gfc-sfp",
    "2gfc-sfp",
    "4gfc-sfp",
    "8gfc-sfpp",
    "16gfc-sfpp",
    "32gfc-sfp28",
    "64gfc-qsfpp",
    "128gfc-qsfp28",
    // infiniband
    "infiniband-sdr",
    "infiniband-ddr",
    "infiniband-qdr",
    "infiniband-fdr10",
    "infiniband-fdr",
    "infiniband-edr",
    "infiniband-hdr",
    "infiniband-ndr",
    "infiniband-xdr",
    // serial
    "t1",
    "e1",
    "t3",
    "e3",
    // broadband
    "xdsl",
    "docsis",
    // PON
    "gpon",
    "xg-pon",
    "xgs-pon",
    "ng-pon2",
    "epon",
    "10g-epon",
    // stacking
    "cisco-stackwise",
    "cisco-stackwise-plus",
    "cisco-flexstack",
    "cisco-flexstack-plus",
    "cisco-stackwise-80",
    "cisco-stackwise-160",
    "cisco-stackwise-320",
    "cisco-stackwise-480",
    "cisco-stackwise-1t",
    "juniper-vcp",
    "extreme-summitstack",
    "extreme-summitstack-128",
    "extreme-summitstack-256",
    "extreme-summitstack-512",
    "other",
];

/// 802.1Q modes. An empty mode is treated as unset.
pub const INTERFACE_MODES: &[&str] = &["access", "tagged", "tagged-all"];

/// A network interface on a device. Identified by name within its device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Box<Device>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wwn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mgmt_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Interface {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Interface {
    const OBJECT_TYPE: ObjectType = ObjectType::Interface;

    record_plumbing!(Interface);

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            device: Some(Box::new(Device::placeholder())),
            interface_type: Some(DEFAULT_INTERFACE_TYPE.to_string()),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(t) = self.interface_type.as_deref()
            && !INTERFACE_TYPES.contains(&t)
        {
            return Err(ValidationError::InvalidInterfaceType(t.to_string()));
        }
        if let Some(m) = self.mode.as_deref()
            && !m.is_empty()
            && !INTERFACE_MODES.contains(&m)
        {
            return Err(ValidationError::InvalidInterfaceMode(m.to_string()));
        }
        Ok(())
    }

    fn normalise(&mut self) {
        if self.mode.as_deref() == Some("") {
            self.mode = None;
        }
        normalise_tags(&mut self.tags);
    }

    fn set_defaults(&mut self) {
        self.interface_type
            .get_or_insert_with(|| DEFAULT_INTERFACE_TYPE.to_string());
    }

    /// An interface is only unambiguous together with its device, so the
    /// minimal form keeps the device id as well.
    fn reference_of(&self) -> Self {
        Self {
            id: self.id,
            device: self
                .device
                .as_ref()
                .filter(|d| d.id > 0)
                .map(|d| Box::new(Device::reference(d.id))),
            ..Self::default()
        }
    }

    fn merge_from_actual(&mut self, actual: &Self) {
        self.id = actual.id;
        if !actual.name.is_empty() {
            self.name.clone_from(&actual.name);
        }
        fill(&mut self.label, &actual.label);
        fill(&mut self.interface_type, &actual.interface_type);
        fill(&mut self.enabled, &actual.enabled);
        fill(&mut self.mtu, &actual.mtu);
        fill(&mut self.mac_address, &actual.mac_address);
        fill(&mut self.speed, &actual.speed);
        fill(&mut self.wwn, &actual.wwn);
        fill(&mut self.mgmt_only, &actual.mgmt_only);
        fill(&mut self.description, &actual.description);
        fill(&mut self.mark_connected, &actual.mark_connected);
        fill(&mut self.mode, &actual.mode);
    }
}
