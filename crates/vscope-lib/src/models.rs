//! Core data models: the seven inventory tables

use serde::{Deserialize, Serialize};

/// MiB per binary gibibyte.
pub const MIB_PER_GIB: f64 = 1024.0;
/// MiB per binary tebibyte.
pub const MIB_PER_TIB: f64 = 1_048_576.0;

/// Convert a MiB quantity to GiB.
pub fn mib_to_gib(mib: f64) -> f64 {
    mib / MIB_PER_GIB
}

/// Convert a MiB quantity to TiB.
pub fn mib_to_tib(mib: f64) -> f64 {
    mib / MIB_PER_TIB
}

/// Power state of a virtual machine as reported by the export.
///
/// Unrecognized states are kept as [`PowerState::Unknown`]: such rows count
/// toward "Total" figures but toward none of the per-state buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
    Unknown,
}

impl PowerState {
    pub fn from_sheet(value: &str) -> Self {
        match value.trim() {
            "poweredOn" => PowerState::PoweredOn,
            "poweredOff" => PowerState::PoweredOff,
            "suspended" => PowerState::Suspended,
            _ => PowerState::Unknown,
        }
    }

    pub fn is_on(self) -> bool {
        self == PowerState::PoweredOn
    }

    /// Off and suspended share a bucket in the storage summaries.
    pub fn is_off_or_suspended(self) -> bool {
        matches!(self, PowerState::PoweredOff | PowerState::Suspended)
    }
}

/// One virtual machine (vInfo sheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmRecord {
    pub id: String,
    pub name: String,
    pub power_state: PowerState,
    pub cpu_count: u32,
    pub memory_mib: f64,
    pub provisioned_mib: f64,
    pub in_use_mib: f64,
    pub datacenter: String,
    pub cluster: String,
    pub host: String,
    pub guest_os_config: Option<String>,
    pub guest_os_tools: Option<String>,
}

/// Per-VM vCPU allocation (vCPU sheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuRecord {
    pub vm_id: String,
    pub vm_name: String,
    pub power_state: PowerState,
    pub cpu_count: u32,
    pub cluster: String,
}

/// Per-VM memory allocation (vMemory sheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub vm_id: String,
    pub vm_name: String,
    pub power_state: PowerState,
    pub size_mib: f64,
    pub cluster: String,
}

/// One virtual disk (vDisk sheet); a VM may have several.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskRecord {
    pub vm_id: String,
    pub power_state: PowerState,
    pub capacity_mib: f64,
    pub thin: bool,
    pub cluster: String,
}

/// One guest filesystem partition (vPartition sheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionRecord {
    pub vm_id: String,
    pub power_state: PowerState,
    pub capacity_mib: f64,
    pub consumed_mib: f64,
    pub cluster: String,
}

/// One physical host (vHost sheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    pub cluster: String,
    pub clock_speed_mhz: f64,
    pub socket_count: u32,
    pub cores_per_socket: u32,
    pub core_count: u32,
    pub cpu_usage_pct: f64,
    pub memory_mib: f64,
    pub memory_usage_pct: f64,
    pub vm_count: u32,
}

/// One shared storage volume (vDatastore sheet). Datastores carry no
/// cluster attribution and are therefore never cluster-filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreRecord {
    pub object_id: String,
    pub capacity_mib: f64,
    pub provisioned_mib: f64,
    pub in_use_mib: f64,
}

/// A full inventory snapshot: the seven tables produced by one upload.
///
/// Tables are never mutated in place; every transformation yields a new
/// snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub vms: Vec<VmRecord>,
    pub cpus: Vec<CpuRecord>,
    pub memory: Vec<MemoryRecord>,
    pub disks: Vec<DiskRecord>,
    pub partitions: Vec<PartitionRecord>,
    pub hosts: Vec<HostRecord>,
    pub datastores: Vec<DatastoreRecord>,
}
