//! The closed set of inventory records.

use crate::{
    Cluster, ClusterGroup, ClusterType, Device, DeviceRole, DeviceType, Interface, IpAddress,
    Manufacturer, ObjectType, Platform, Prefix, Record, Site, Tag, ValidationError, VirtualDisk,
    VirtualMachine, VmInterface,
};
use serde::Serialize;

/// One inventory record of any kind.
///
/// Serializes as the bare record; the kind travels separately as an
/// [`ObjectType`], so decoding goes through [`Entity::decode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Site(Site),
    Manufacturer(Manufacturer),
    Platform(Platform),
    DeviceType(DeviceType),
    DeviceRole(DeviceRole),
    Device(Device),
    Interface(Interface),
    IpAddress(IpAddress),
    Prefix(Prefix),
    Tag(Tag),
    ClusterGroup(ClusterGroup),
    ClusterType(ClusterType),
    Cluster(Cluster),
    VirtualMachine(VirtualMachine),
    VmInterface(VmInterface),
    VirtualDisk(VirtualDisk),
}

macro_rules! each_record {
    ($entity:expr, $record:ident => $body:expr) => {
        match $entity {
            Entity::Site($record) => $body,
            Entity::Manufacturer($record) => $body,
            Entity::Platform($record) => $body,
            Entity::DeviceType($record) => $body,
            Entity::DeviceRole($record) => $body,
            Entity::Device($record) => $body,
            Entity::Interface($record) => $body,
            Entity::IpAddress($record) => $body,
            Entity::Prefix($record) => $body,
            Entity::Tag($record) => $body,
            Entity::ClusterGroup($record) => $body,
            Entity::ClusterType($record) => $body,
            Entity::Cluster($record) => $body,
            Entity::VirtualMachine($record) => $body,
            Entity::VmInterface($record) => $body,
            Entity::VirtualDisk($record) => $body,
        }
    };
}

impl Entity {
    /// Decodes a JSON payload as a record of `object_type`.
    pub fn decode(object_type: ObjectType, value: serde_json::Value) -> serde_json::Result<Self> {
        fn typed<T: Record>(value: serde_json::Value) -> serde_json::Result<Entity> {
            serde_json::from_value::<T>(value).map(Record::into_entity)
        }

        match object_type {
            ObjectType::Site => typed::<Site>(value),
            ObjectType::Manufacturer => typed::<Manufacturer>(value),
            ObjectType::Platform => typed::<Platform>(value),
            ObjectType::DeviceType => typed::<DeviceType>(value),
            ObjectType::DeviceRole => typed::<DeviceRole>(value),
            ObjectType::Device => typed::<Device>(value),
            ObjectType::Interface => typed::<Interface>(value),
            ObjectType::IpAddress => typed::<IpAddress>(value),
            ObjectType::Prefix => typed::<Prefix>(value),
            ObjectType::Tag => typed::<Tag>(value),
            ObjectType::ClusterGroup => typed::<ClusterGroup>(value),
            ObjectType::ClusterType => typed::<ClusterType>(value),
            ObjectType::Cluster => typed::<Cluster>(value),
            ObjectType::VirtualMachine => typed::<VirtualMachine>(value),
            ObjectType::VmInterface => typed::<VmInterface>(value),
            ObjectType::VirtualDisk => typed::<VirtualDisk>(value),
        }
    }

    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        fn kind<T: Record>(_: &T) -> ObjectType {
            T::OBJECT_TYPE
        }
        each_record!(self, r => kind(r))
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        each_record!(self, r => r.id())
    }

    pub fn set_id(&mut self, id: u64) {
        each_record!(self, r => r.set_id(id))
    }

    #[must_use]
    pub fn natural_key(&self) -> &str {
        each_record!(self, r => r.natural_key())
    }

    #[must_use]
    pub fn tags(&self) -> Option<&[Tag]> {
        each_record!(self, r => r.tags())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        each_record!(self, r => r.validate())
    }

    /// The wire payload of the record.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
