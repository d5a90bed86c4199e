//! Cluster-level capacity summaries and host detail tables

use serde::{Deserialize, Serialize};

use crate::models::{mib_to_gib, mib_to_tib, DatastoreRecord, HostRecord};

/// Physical CPU capacity across the selected hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuCapacity {
    pub total_ghz: f64,
    pub consumed_ghz: f64,
    /// `Σconsumed / Σtotal × 100`; `None` when no capacity exists.
    pub utilization_pct: Option<f64>,
}

/// Per host: total GHz = cores × clock MHz / 1000; consumed scales by the
/// reported usage percentage.
pub fn cpu_capacity(hosts: &[HostRecord]) -> CpuCapacity {
    let total_ghz: f64 = hosts.iter().map(host_total_ghz).sum();
    let consumed_ghz: f64 = hosts
        .iter()
        .map(|h| host_total_ghz(h) * h.cpu_usage_pct / 100.0)
        .sum();
    let utilization_pct = (total_ghz > 0.0).then(|| consumed_ghz / total_ghz * 100.0);
    CpuCapacity {
        total_ghz,
        consumed_ghz,
        utilization_pct,
    }
}

fn host_total_ghz(host: &HostRecord) -> f64 {
    host.core_count as f64 * host.clock_speed_mhz / 1000.0
}

/// Physical memory capacity across the selected hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCapacity {
    pub total_gib: f64,
    pub consumed_gib: f64,
    /// Unweighted mean of the per-host usage percentages. Deliberately not
    /// capacity-weighted; see DESIGN.md before changing.
    pub utilization_pct: Option<f64>,
}

pub fn memory_capacity(hosts: &[HostRecord]) -> MemoryCapacity {
    let total_gib: f64 = hosts.iter().map(|h| mib_to_gib(h.memory_mib)).sum();
    let consumed_gib: f64 = hosts
        .iter()
        .map(|h| mib_to_gib(h.memory_mib) * h.memory_usage_pct / 100.0)
        .sum();
    let utilization_pct = mean(hosts.iter().map(|h| h.memory_usage_pct));
    MemoryCapacity {
        total_gib,
        consumed_gib,
        utilization_pct,
    }
}

/// Shared datastore capacity; datastores are global, never filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreCapacity {
    pub provisioned_tib: f64,
    pub consumed_tib: f64,
    pub utilization_pct: Option<f64>,
}

pub fn datastore_capacity(datastores: &[DatastoreRecord]) -> DatastoreCapacity {
    let provisioned_tib: f64 = datastores.iter().map(|d| mib_to_tib(d.provisioned_mib)).sum();
    let consumed_tib: f64 = datastores.iter().map(|d| mib_to_tib(d.in_use_mib)).sum();
    let utilization_pct = (provisioned_tib > 0.0).then(|| consumed_tib / provisioned_tib * 100.0);
    DatastoreCapacity {
        provisioned_tib,
        consumed_tib,
        utilization_pct,
    }
}

/// Fixed-row pCPU detail table for the host section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCpuDetails {
    pub consumed_ghz: f64,
    pub total_ghz: f64,
    pub max_cores_per_host: u32,
    pub max_clock_ghz: f64,
    pub mean_clock_ghz: f64,
    pub max_usage_pct: f64,
    pub mean_usage_pct: f64,
}

pub fn host_cpu_details(hosts: &[HostRecord]) -> HostCpuDetails {
    let capacity = cpu_capacity(hosts);
    HostCpuDetails {
        consumed_ghz: capacity.consumed_ghz,
        total_ghz: capacity.total_ghz,
        max_cores_per_host: hosts.iter().map(|h| h.core_count).max().unwrap_or(0),
        max_clock_ghz: max_or_zero(hosts.iter().map(|h| h.clock_speed_mhz / 1000.0)),
        mean_clock_ghz: mean(hosts.iter().map(|h| h.clock_speed_mhz / 1000.0)).unwrap_or(0.0),
        max_usage_pct: max_or_zero(hosts.iter().map(|h| h.cpu_usage_pct)),
        mean_usage_pct: mean(hosts.iter().map(|h| h.cpu_usage_pct)).unwrap_or(0.0),
    }
}

/// Fixed-row pMemory detail table for the host section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostMemoryDetails {
    pub consumed_gib: f64,
    pub total_gib: f64,
    pub max_host_gib: f64,
    pub max_usage_pct: f64,
    pub mean_usage_pct: f64,
}

pub fn host_memory_details(hosts: &[HostRecord]) -> HostMemoryDetails {
    let capacity = memory_capacity(hosts);
    HostMemoryDetails {
        consumed_gib: capacity.consumed_gib,
        total_gib: capacity.total_gib,
        max_host_gib: max_or_zero(hosts.iter().map(|h| mib_to_gib(h.memory_mib))),
        max_usage_pct: max_or_zero(hosts.iter().map(|h| h.memory_usage_pct)),
        mean_usage_pct: mean(hosts.iter().map(|h| h.memory_usage_pct)).unwrap_or(0.0),
    }
}

/// Fixed-row hardware detail table for the host section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostHardwareDetails {
    pub host_count: usize,
    pub socket_count: u64,
    pub core_count: u64,
    pub max_vms_per_host: u32,
    pub mean_vms_per_host: f64,
}

pub fn host_hardware_details(hosts: &[HostRecord]) -> HostHardwareDetails {
    HostHardwareDetails {
        host_count: hosts.len(),
        socket_count: hosts.iter().map(|h| h.socket_count as u64).sum(),
        core_count: hosts.iter().map(|h| h.core_count as u64).sum(),
        max_vms_per_host: hosts.iter().map(|h| h.vm_count).max().unwrap_or(0),
        mean_vms_per_host: mean(hosts.iter().map(|h| h.vm_count as f64)).unwrap_or(0.0),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn max_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, f64::max)
}
