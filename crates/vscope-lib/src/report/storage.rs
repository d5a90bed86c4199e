//! Storage summaries and the partition/disk reconciliation
//!
//! VMs without guest tooling report no partition rows, so their storage is
//! estimated from disk capacity instead: 100% counts as provisioned and a
//! fixed 80% as consumed. A VM contributes through exactly one of the two
//! paths; any partition row at all routes it through partition data.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    mib_to_tib, DatastoreRecord, DiskRecord, PartitionRecord, PowerState, VmRecord,
};

/// Consumed-storage share assumed for disks of partition-less VMs.
pub const FALLBACK_CONSUMED_RATIO: f64 = 0.8;

/// A quantity split by the storage power buckets.
///
/// Storage tables group suspended with powered-off; rows in unknown power
/// states count toward the total only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerSplit {
    pub on: f64,
    pub off_suspended: f64,
    pub total: f64,
}

impl PowerSplit {
    fn add(&mut self, state: PowerState, value: f64) {
        if state.is_on() {
            self.on += value;
        } else if state.is_off_or_suspended() {
            self.off_suspended += value;
        }
        self.total += value;
    }
}

/// Guest partition rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub vm_count: usize,
    pub partitions_on: usize,
    pub partitions_off_suspended: usize,
    pub partitions_total: usize,
    pub consumed_tib: PowerSplit,
    pub provisioned_tib: PowerSplit,
}

pub fn partition_summary(partitions: &[PartitionRecord]) -> PartitionSummary {
    let mut consumed = PowerSplit::default();
    let mut provisioned = PowerSplit::default();
    for p in partitions {
        consumed.add(p.power_state, mib_to_tib(p.consumed_mib));
        provisioned.add(p.power_state, mib_to_tib(p.capacity_mib));
    }
    PartitionSummary {
        vm_count: distinct_count(partitions.iter().map(|p| p.vm_id.as_str())),
        partitions_on: partitions.iter().filter(|p| p.power_state.is_on()).count(),
        partitions_off_suspended: partitions
            .iter()
            .filter(|p| p.power_state.is_off_or_suspended())
            .count(),
        partitions_total: partitions.len(),
        consumed_tib: consumed,
        provisioned_tib: provisioned,
    }
}

/// Disk counts per power bucket, with the thin-provisioned share.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskCount {
    pub disks: usize,
    pub thin: usize,
}

/// Virtual disk rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSummary {
    pub vm_count: usize,
    pub on: DiskCount,
    pub off_suspended: DiskCount,
    pub total: DiskCount,
    pub capacity_tib: PowerSplit,
}

pub fn disk_summary(disks: &[DiskRecord]) -> DiskSummary {
    let count = |pred: &dyn Fn(&&DiskRecord) -> bool| DiskCount {
        disks: disks.iter().filter(pred).count(),
        thin: disks.iter().filter(pred).filter(|d| d.thin).count(),
    };
    let mut capacity = PowerSplit::default();
    for d in disks {
        capacity.add(d.power_state, mib_to_tib(d.capacity_mib));
    }
    DiskSummary {
        vm_count: distinct_count(disks.iter().map(|d| d.vm_id.as_str())),
        on: count(&|d| d.power_state.is_on()),
        off_suspended: count(&|d| d.power_state.is_off_or_suspended()),
        total: count(&|_| true),
        capacity_tib: capacity,
    }
}

/// Datastore rollup; datastores are global and counted by object id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreSummary {
    pub datastore_count: usize,
    pub capacity_tib: f64,
    pub provisioned_tib: f64,
    pub in_use_tib: f64,
    pub free_pct: Option<f64>,
}

pub fn datastore_summary(datastores: &[DatastoreRecord]) -> DatastoreSummary {
    let provisioned_tib: f64 = datastores.iter().map(|d| mib_to_tib(d.provisioned_mib)).sum();
    let in_use_tib: f64 = datastores.iter().map(|d| mib_to_tib(d.in_use_mib)).sum();
    DatastoreSummary {
        datastore_count: distinct_count(datastores.iter().map(|d| d.object_id.as_str())),
        capacity_tib: datastores.iter().map(|d| mib_to_tib(d.capacity_mib)).sum(),
        provisioned_tib,
        in_use_tib,
        free_pct: (provisioned_tib > 0.0).then(|| (1.0 - in_use_tib / provisioned_tib) * 100.0),
    }
}

/// Hypervisor-reported VM storage (vInfo provisioned/in-use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmGuestStorageSummary {
    pub consumed_tib: PowerSplit,
    pub provisioned_tib: PowerSplit,
}

pub fn vm_guest_storage_summary(vms: &[VmRecord]) -> VmGuestStorageSummary {
    let mut consumed = PowerSplit::default();
    let mut provisioned = PowerSplit::default();
    for vm in vms {
        consumed.add(vm.power_state, mib_to_tib(vm.in_use_mib));
        provisioned.add(vm.power_state, mib_to_tib(vm.provisioned_mib));
    }
    VmGuestStorageSummary {
        consumed_tib: consumed,
        provisioned_tib: provisioned,
    }
}

/// Unified VM storage: partition data where available, disk heuristic
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmStorageSummary {
    pub vms_on: usize,
    pub vms_off_suspended: usize,
    pub vms_total: usize,
    pub consumed_tib: PowerSplit,
    pub provisioned_tib: PowerSplit,
}

/// VM ids that appear in the disk table but have no partition row at all.
pub fn vms_without_partitions<'a>(
    disks: &'a [DiskRecord],
    partitions: &[PartitionRecord],
) -> BTreeSet<&'a str> {
    let with_partitions: BTreeSet<&str> =
        partitions.iter().map(|p| p.vm_id.as_str()).collect();
    disks
        .iter()
        .map(|d| d.vm_id.as_str())
        .filter(|id| !with_partitions.contains(id))
        .collect()
}

pub fn vm_storage_summary(
    disks: &[DiskRecord],
    partitions: &[PartitionRecord],
    vms: &[VmRecord],
) -> VmStorageSummary {
    let fallback_vms = vms_without_partitions(disks, partitions);

    let mut provisioned = PowerSplit::default();
    let mut consumed = PowerSplit::default();
    for p in partitions {
        provisioned.add(p.power_state, mib_to_tib(p.capacity_mib));
        consumed.add(p.power_state, mib_to_tib(p.consumed_mib));
    }
    for d in disks {
        if !fallback_vms.contains(d.vm_id.as_str()) {
            continue;
        }
        let capacity_tib = mib_to_tib(d.capacity_mib);
        provisioned.add(d.power_state, capacity_tib);
        consumed.add(d.power_state, capacity_tib * FALLBACK_CONSUMED_RATIO);
    }

    VmStorageSummary {
        vms_on: vms.iter().filter(|v| v.power_state.is_on()).count(),
        vms_off_suspended: vms
            .iter()
            .filter(|v| v.power_state.is_off_or_suspended())
            .count(),
        vms_total: vms.len(),
        consumed_tib: consumed,
        provisioned_tib: provisioned,
    }
}

fn distinct_count<'a>(ids: impl Iterator<Item = &'a str>) -> usize {
    ids.collect::<BTreeSet<_>>().len()
}
