//! Per-kind reconciliation behaviour: which references a record holds and
//! how the inventory looks it up.

use crate::error::ReconcileResult;
use invsync_model::{
    AssignedObject, Cluster, ClusterGroup, ClusterType, Device, DeviceRole, DeviceType, Interface,
    IpAddress, Manufacturer, Platform, Prefix, Record, Site, Tag, VirtualDisk, VirtualMachine,
    VmInterface,
};
use invsync_types::LookupParams;

/// Receives every nested reference of a record, in field order.
///
/// `slot` is the reference on the record being visited; `baseline` is the
/// same field on the record's actual state, when one is being compared.
pub trait NestedVisitor {
    fn visit<T: Reconcile>(
        &mut self,
        field: &'static str,
        required: bool,
        slot: &mut Option<Box<T>>,
        baseline: Option<&mut Option<Box<T>>>,
    ) -> ReconcileResult<()>;
}

/// A record kind the engine can resolve and patch.
pub trait Reconcile: Record {
    /// Hands each nested reference to `visitor`. Kinds without references
    /// keep the default.
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        _baseline: Option<&mut Self>,
        _visitor: &mut V,
    ) -> ReconcileResult<()> {
        Ok(())
    }

    /// How the inventory finds this record.
    fn query_params(&self) -> LookupParams {
        LookupParams::query(self.natural_key())
    }
}

impl Reconcile for Site {}
impl Reconcile for Manufacturer {}
impl Reconcile for DeviceRole {}
impl Reconcile for Tag {}
impl Reconcile for ClusterGroup {}
impl Reconcile for ClusterType {}

impl Reconcile for Platform {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit(
            "manufacturer",
            false,
            &mut self.manufacturer,
            baseline.as_mut().map(|b| &mut b.manufacturer),
        )
    }
}

impl Reconcile for DeviceType {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit(
            "manufacturer",
            true,
            &mut self.manufacturer,
            baseline.as_mut().map(|b| &mut b.manufacturer),
        )
    }

    fn query_params(&self) -> LookupParams {
        let mut params = LookupParams::query(&self.model);
        if let Some(manufacturer) = &self.manufacturer {
            params.insert_filter("manufacturer__name", &manufacturer.name);
        }
        params
    }
}

impl Reconcile for Device {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit("site", true, &mut self.site, baseline.as_mut().map(|b| &mut b.site))?;
        v.visit(
            "device_type",
            true,
            &mut self.device_type,
            baseline.as_mut().map(|b| &mut b.device_type),
        )?;
        v.visit("role", true, &mut self.role, baseline.as_mut().map(|b| &mut b.role))?;
        v.visit(
            "platform",
            false,
            &mut self.platform,
            baseline.as_mut().map(|b| &mut b.platform),
        )
    }

    fn query_params(&self) -> LookupParams {
        let mut params = LookupParams::query(&self.name);
        if let Some(site) = &self.site {
            params.insert_filter("site__name", &site.name);
        }
        params
    }
}

impl Reconcile for Interface {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit("device", true, &mut self.device, baseline.as_mut().map(|b| &mut b.device))
    }

    fn query_params(&self) -> LookupParams {
        let mut params = LookupParams::query(&self.name);
        if let Some(device) = &self.device {
            params.insert_filter("device__name", &device.name);
            if let Some(site) = &device.site {
                params.insert_filter("device__site__name", &site.name);
            }
        }
        params
    }
}

impl Reconcile for IpAddress {
    /// The assigned object is visited as its concrete kind and re-attached
    /// afterwards; an assignment left empty is dropped.
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        let mut assigned = self.assigned_object.take().unwrap_or_default();
        let mut actual_assigned = baseline
            .as_mut()
            .map(|b| b.assigned_object.take().unwrap_or_default());

        let result = v.visit(
            "assigned_object.interface",
            false,
            &mut assigned.interface,
            actual_assigned.as_mut().map(|a| &mut a.interface),
        );

        self.assigned_object = non_empty(assigned);
        if let (Some(b), Some(actual)) = (baseline, actual_assigned) {
            b.assigned_object = non_empty(actual);
        }
        result
    }

    fn query_params(&self) -> LookupParams {
        let mut params = LookupParams::query(&self.address);
        if let Some(interface) = self.interface() {
            params.insert_filter("interface__name", &interface.name);
            if let Some(device) = &interface.device {
                params.insert_filter("interface__device__name", &device.name);
                if let Some(site) = &device.site {
                    params.insert_filter("interface__device__site__name", &site.name);
                }
            }
        }
        params
    }
}

fn non_empty(assigned: AssignedObject) -> Option<AssignedObject> {
    (!assigned.is_empty()).then_some(assigned)
}

impl Reconcile for Prefix {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit("site", true, &mut self.site, baseline.as_mut().map(|b| &mut b.site))
    }
}

impl Reconcile for Cluster {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit(
            "type",
            true,
            &mut self.cluster_type,
            baseline.as_mut().map(|b| &mut b.cluster_type),
        )?;
        v.visit("group", false, &mut self.group, baseline.as_mut().map(|b| &mut b.group))?;
        v.visit("site", false, &mut self.site, baseline.as_mut().map(|b| &mut b.site))
    }
}

impl Reconcile for VirtualMachine {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit("site", false, &mut self.site, baseline.as_mut().map(|b| &mut b.site))?;
        v.visit("cluster", false, &mut self.cluster, baseline.as_mut().map(|b| &mut b.cluster))?;
        v.visit("role", false, &mut self.role, baseline.as_mut().map(|b| &mut b.role))?;
        v.visit("device", false, &mut self.device, baseline.as_mut().map(|b| &mut b.device))?;
        v.visit(
            "platform",
            false,
            &mut self.platform,
            baseline.as_mut().map(|b| &mut b.platform),
        )?;
        v.visit(
            "primary_ip4",
            false,
            &mut self.primary_ip4,
            baseline.as_mut().map(|b| &mut b.primary_ip4),
        )?;
        v.visit(
            "primary_ip6",
            false,
            &mut self.primary_ip6,
            baseline.as_mut().map(|b| &mut b.primary_ip6),
        )
    }
}

impl Reconcile for VmInterface {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit(
            "virtual_machine",
            true,
            &mut self.virtual_machine,
            baseline.as_mut().map(|b| &mut b.virtual_machine),
        )
    }

    fn query_params(&self) -> LookupParams {
        virtual_machine_scoped(&self.name, self.virtual_machine.as_deref())
    }
}

impl Reconcile for VirtualDisk {
    fn visit_nested<V: NestedVisitor>(
        &mut self,
        mut baseline: Option<&mut Self>,
        v: &mut V,
    ) -> ReconcileResult<()> {
        v.visit(
            "virtual_machine",
            true,
            &mut self.virtual_machine,
            baseline.as_mut().map(|b| &mut b.virtual_machine),
        )
    }

    fn query_params(&self) -> LookupParams {
        virtual_machine_scoped(&self.name, self.virtual_machine.as_deref())
    }
}

fn virtual_machine_scoped(name: &str, vm: Option<&VirtualMachine>) -> LookupParams {
    let mut params = LookupParams::query(name);
    if let Some(vm) = vm {
        params.insert_filter("virtual_machine__name", &vm.name);
    }
    params
}
