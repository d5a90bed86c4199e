//! Growth-based sizing projections
//!
//! Each computation picks a baseline from a report table, applies an
//! integer growth percentage and rounds the projected value up to a whole
//! unit. vCPU results are integer throughout; memory (GiB) and storage
//! (TiB) keep a two-decimal basis and delta around the integer projection,
//! mirroring how the figures are displayed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::report::overview::{VcpuOverview, VmemoryOverview};
use crate::report::storage::VmStorageSummary;

/// Baseline selector for vCPU sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuSizingBasis {
    /// vCPUs of powered-on VMs.
    PoweredOn,
    /// vCPUs of all VMs.
    Total,
}

/// Baseline selector for vMemory sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemorySizingBasis {
    PoweredOn,
    Total,
}

/// Baseline selector for VM storage sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageSizingBasis {
    ConsumedTotal,
    ConsumedOn,
    ProvisionedTotal,
    ProvisionedOn,
}

/// Integer sizing result (vCPU).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSizing {
    pub basis: u64,
    pub projected: u64,
    pub delta: u64,
    pub generated_at: i64,
}

/// Capacity sizing result (memory GiB / storage TiB): two-decimal basis
/// and delta around an integer projected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySizing {
    pub basis: f64,
    pub projected: u64,
    pub delta: f64,
    pub generated_at: i64,
}

/// Project vCPU demand for a growth percentage in [0, 100].
pub fn size_vcpu(overview: &VcpuOverview, basis: CpuSizingBasis, growth_pct: u32) -> CpuSizing {
    let value = match basis {
        CpuSizingBasis::PoweredOn => overview.on,
        CpuSizingBasis::Total => overview.total,
    };
    let growth = clamp_growth(growth_pct);
    let projected = project(value as f64, growth);
    debug!(?basis, growth, value, projected, "sized vcpu");
    CpuSizing {
        basis: value,
        projected,
        delta: projected - value,
        generated_at: now(),
    }
}

/// Project vMemory demand (GiB).
pub fn size_vmemory(
    overview: &VmemoryOverview,
    basis: MemorySizingBasis,
    growth_pct: u32,
) -> CapacitySizing {
    let value = match basis {
        MemorySizingBasis::PoweredOn => overview.on_gib,
        MemorySizingBasis::Total => overview.total_gib,
    };
    capacity_sizing(value, growth_pct)
}

/// Project VM storage demand (TiB) from the reconciled storage summary.
pub fn size_vm_storage(
    summary: &VmStorageSummary,
    basis: StorageSizingBasis,
    growth_pct: u32,
) -> CapacitySizing {
    let value = match basis {
        StorageSizingBasis::ConsumedTotal => summary.consumed_tib.total,
        StorageSizingBasis::ConsumedOn => summary.consumed_tib.on,
        StorageSizingBasis::ProvisionedTotal => summary.provisioned_tib.total,
        StorageSizingBasis::ProvisionedOn => summary.provisioned_tib.on,
    };
    capacity_sizing(value, growth_pct)
}

fn capacity_sizing(value: f64, growth_pct: u32) -> CapacitySizing {
    let basis = round2(value);
    let projected = project(basis, clamp_growth(growth_pct));
    CapacitySizing {
        basis,
        projected,
        delta: round2(projected as f64 - basis),
        generated_at: now(),
    }
}

fn project(basis: f64, growth_pct: u32) -> u64 {
    (basis * (1.0 + growth_pct as f64 / 100.0)).ceil() as u64
}

fn clamp_growth(growth_pct: u32) -> u32 {
    growth_pct.min(100)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Last computed sizing result per resource, owned by the caller.
///
/// Holds only what is needed to re-display the previous answer; every
/// parameter change recomputes through the `apply_*` methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizingState {
    pub cpu: Option<CpuSizing>,
    pub memory: Option<CapacitySizing>,
    pub storage: Option<CapacitySizing>,
}

impl SizingState {
    pub fn apply_cpu(
        &mut self,
        overview: &VcpuOverview,
        basis: CpuSizingBasis,
        growth_pct: u32,
    ) -> &CpuSizing {
        self.cpu.insert(size_vcpu(overview, basis, growth_pct))
    }

    pub fn apply_memory(
        &mut self,
        overview: &VmemoryOverview,
        basis: MemorySizingBasis,
        growth_pct: u32,
    ) -> &CapacitySizing {
        self.memory.insert(size_vmemory(overview, basis, growth_pct))
    }

    pub fn apply_storage(
        &mut self,
        summary: &VmStorageSummary,
        basis: StorageSizingBasis,
        growth_pct: u32,
    ) -> &CapacitySizing {
        self.storage.insert(size_vm_storage(summary, basis, growth_pct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::storage::PowerSplit;

    fn vcpu(on: u64, total: u64) -> VcpuOverview {
        VcpuOverview {
            on,
            off: 0,
            suspended: 0,
            total,
            max_per_vm_on: None,
            mean_per_vm_on: None,
            per_core_on: None,
            per_core_on_n1: None,
            per_core_total: None,
            per_core_total_n1: None,
        }
    }

    fn vmem(on_gib: f64, total_gib: f64) -> VmemoryOverview {
        VmemoryOverview {
            on_gib,
            off_gib: 0.0,
            suspended_gib: 0.0,
            total_gib,
            max_per_vm_on_gib: None,
            mean_per_vm_on_gib: None,
        }
    }

    fn storage(consumed_total: f64, provisioned_on: f64) -> VmStorageSummary {
        VmStorageSummary {
            vms_on: 1,
            vms_off_suspended: 0,
            vms_total: 1,
            consumed_tib: PowerSplit {
                on: consumed_total,
                off_suspended: 0.0,
                total: consumed_total,
            },
            provisioned_tib: PowerSplit {
                on: provisioned_on,
                off_suspended: 0.0,
                total: provisioned_on,
            },
        }
    }

    #[test]
    fn test_vcpu_growth_example() {
        let result = size_vcpu(&vcpu(100, 150), CpuSizingBasis::PoweredOn, 30);
        assert_eq!(result.basis, 100);
        assert_eq!(result.projected, 130);
        assert_eq!(result.delta, 30);
    }

    #[test]
    fn test_vcpu_ceiling_behavior() {
        // 101 x 1.01 = 102.01, rounded up to 103.
        let result = size_vcpu(&vcpu(101, 101), CpuSizingBasis::Total, 1);
        assert_eq!(result.projected, 103);
        assert_eq!(result.delta, 2);
    }

    #[test]
    fn test_zero_growth_is_idempotent() {
        let result = size_vcpu(&vcpu(42, 64), CpuSizingBasis::PoweredOn, 0);
        assert_eq!(result.projected, result.basis);
        assert_eq!(result.delta, 0);

        let result = size_vmemory(&vmem(24.0, 32.0), MemorySizingBasis::PoweredOn, 0);
        assert_eq!(result.basis, 24.0);
        assert_eq!(result.projected, 24);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn test_memory_precision_asymmetry() {
        // Basis keeps two decimals, projection rounds up to an integer.
        let result = size_vmemory(&vmem(10.456, 0.0), MemorySizingBasis::PoweredOn, 10);
        assert_eq!(result.basis, 10.46);
        // 10.46 x 1.1 = 11.506 -> 12
        assert_eq!(result.projected, 12);
        assert_eq!(result.delta, 1.54);
    }

    #[test]
    fn test_storage_basis_selectors() {
        let summary = storage(7.25, 12.5);
        let consumed = size_vm_storage(&summary, StorageSizingBasis::ConsumedTotal, 20);
        assert_eq!(consumed.basis, 7.25);
        // 7.25 x 1.2 = 8.7 -> 9
        assert_eq!(consumed.projected, 9);
        assert_eq!(consumed.delta, 1.75);

        let provisioned = size_vm_storage(&summary, StorageSizingBasis::ProvisionedOn, 0);
        assert_eq!(provisioned.basis, 12.5);
        assert_eq!(provisioned.projected, 13);
        assert_eq!(provisioned.delta, 0.5);
    }

    #[test]
    fn test_growth_clamped_to_100() {
        let result = size_vcpu(&vcpu(10, 10), CpuSizingBasis::Total, 250);
        assert_eq!(result.projected, 20);
    }

    #[test]
    fn test_sizing_state_holds_last_result() {
        let mut state = SizingState::default();
        assert!(state.cpu.is_none());
        let first = state.apply_cpu(&vcpu(100, 150), CpuSizingBasis::PoweredOn, 30).clone();
        assert_eq!(state.cpu, Some(first));
        state.apply_cpu(&vcpu(100, 150), CpuSizingBasis::Total, 10);
        let last = state.cpu.as_ref().unwrap();
        assert_eq!(last.basis, 150);
        assert_eq!(last.projected, 165);
        assert!(state.memory.is_none());
    }
}
