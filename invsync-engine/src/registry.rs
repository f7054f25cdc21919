//! Type registry: type tag to wrapper.

use crate::error::{ReconcileError, ReconcileResult};
use crate::wrapper::{ComparableData, DataWrapper};
use invsync_model::{
    Cluster, ClusterGroup, ClusterType, Device, DeviceRole, DeviceType, Interface, IpAddress,
    Manufacturer, ObjectType, Platform, Prefix, Site, Tag, VirtualDisk, VirtualMachine,
    VmInterface,
};

/// Creates an empty top-level wrapper for the kind named by `object_type`.
///
/// This is the single place a new reconcilable kind has to be registered.
pub fn new_data_wrapper(object_type: &str) -> ReconcileResult<Box<dyn ComparableData>> {
    let kind = object_type
        .parse::<ObjectType>()
        .map_err(ReconcileError::UnsupportedDataType)?;
    Ok(wrapper_for(kind))
}

/// Creates an empty top-level wrapper for `kind`.
#[must_use]
pub fn wrapper_for(kind: ObjectType) -> Box<dyn ComparableData> {
    match kind {
        ObjectType::Site => Box::new(DataWrapper::<Site>::new()),
        ObjectType::Manufacturer => Box::new(DataWrapper::<Manufacturer>::new()),
        ObjectType::Platform => Box::new(DataWrapper::<Platform>::new()),
        ObjectType::DeviceType => Box::new(DataWrapper::<DeviceType>::new()),
        ObjectType::DeviceRole => Box::new(DataWrapper::<DeviceRole>::new()),
        ObjectType::Device => Box::new(DataWrapper::<Device>::new()),
        ObjectType::Interface => Box::new(DataWrapper::<Interface>::new()),
        ObjectType::IpAddress => Box::new(DataWrapper::<IpAddress>::new()),
        ObjectType::Prefix => Box::new(DataWrapper::<Prefix>::new()),
        ObjectType::Tag => Box::new(DataWrapper::<Tag>::new()),
        ObjectType::ClusterGroup => Box::new(DataWrapper::<ClusterGroup>::new()),
        ObjectType::ClusterType => Box::new(DataWrapper::<ClusterType>::new()),
        ObjectType::Cluster => Box::new(DataWrapper::<Cluster>::new()),
        ObjectType::VirtualMachine => Box::new(DataWrapper::<VirtualMachine>::new()),
        ObjectType::VmInterface => Box::new(DataWrapper::<VmInterface>::new()),
        ObjectType::VirtualDisk => Box::new(DataWrapper::<VirtualDisk>::new()),
    }
}
