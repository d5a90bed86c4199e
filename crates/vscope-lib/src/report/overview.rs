//! vCPU and vMemory overview tables

use serde::{Deserialize, Serialize};

use crate::models::{mib_to_gib, CpuRecord, HostRecord, MemoryRecord, PowerState};

/// vCPU allocation split by power state, with oversubscription ratios.
///
/// Ratios are `None` when the core denominator is zero; the N-1 variants
/// are exactly `0` for a single-host (or empty) selection, modelling "no
/// failover headroom to size against" rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcpuOverview {
    pub on: u64,
    pub off: u64,
    pub suspended: u64,
    pub total: u64,
    pub max_per_vm_on: Option<u32>,
    pub mean_per_vm_on: Option<f64>,
    pub per_core_on: Option<f64>,
    pub per_core_on_n1: Option<f64>,
    pub per_core_total: Option<f64>,
    pub per_core_total_n1: Option<f64>,
}

pub fn vcpu_overview(cpus: &[CpuRecord], hosts: &[HostRecord]) -> VcpuOverview {
    let sum_state = |state: PowerState| -> u64 {
        cpus.iter()
            .filter(|c| c.power_state == state)
            .map(|c| c.cpu_count as u64)
            .sum()
    };
    let on = sum_state(PowerState::PoweredOn);
    let total: u64 = cpus.iter().map(|c| c.cpu_count as u64).sum();

    let on_counts: Vec<u32> = cpus
        .iter()
        .filter(|c| c.power_state.is_on())
        .map(|c| c.cpu_count)
        .collect();
    let mean_per_vm_on = (!on_counts.is_empty())
        .then(|| on_counts.iter().map(|&c| c as f64).sum::<f64>() / on_counts.len() as f64);

    let total_cores: u64 = hosts.iter().map(|h| h.core_count as u64).sum();
    let per_core = |vcpus: u64| (total_cores > 0).then(|| vcpus as f64 / total_cores as f64);
    let per_core_n1 = |vcpus: u64| n_minus_one_ratio(vcpus, total_cores, hosts.len());

    VcpuOverview {
        on,
        off: sum_state(PowerState::PoweredOff),
        suspended: sum_state(PowerState::Suspended),
        total,
        max_per_vm_on: on_counts.iter().copied().max(),
        mean_per_vm_on,
        per_core_on: per_core(on),
        per_core_on_n1: per_core_n1(on),
        per_core_total: per_core(total),
        per_core_total_n1: per_core_n1(total),
    }
}

/// Oversubscription with one host's average core share removed from the
/// denominator. Defined as 0 when there is at most one host.
fn n_minus_one_ratio(vcpus: u64, total_cores: u64, host_count: usize) -> Option<f64> {
    if host_count <= 1 {
        return Some(0.0);
    }
    let denominator = total_cores as f64 / host_count as f64 * (host_count - 1) as f64;
    (denominator > 0.0).then(|| vcpus as f64 / denominator)
}

/// vMemory allocation (GiB) split by power state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmemoryOverview {
    pub on_gib: f64,
    pub off_gib: f64,
    pub suspended_gib: f64,
    pub total_gib: f64,
    pub max_per_vm_on_gib: Option<f64>,
    pub mean_per_vm_on_gib: Option<f64>,
}

pub fn vmemory_overview(memory: &[MemoryRecord]) -> VmemoryOverview {
    let sum_state = |state: PowerState| -> f64 {
        memory
            .iter()
            .filter(|m| m.power_state == state)
            .map(|m| mib_to_gib(m.size_mib))
            .sum()
    };
    let on_sizes: Vec<f64> = memory
        .iter()
        .filter(|m| m.power_state.is_on())
        .map(|m| mib_to_gib(m.size_mib))
        .collect();

    VmemoryOverview {
        on_gib: sum_state(PowerState::PoweredOn),
        off_gib: sum_state(PowerState::PoweredOff),
        suspended_gib: sum_state(PowerState::Suspended),
        total_gib: memory.iter().map(|m| mib_to_gib(m.size_mib)).sum(),
        max_per_vm_on_gib: (!on_sizes.is_empty()).then(|| on_sizes.iter().fold(0.0_f64, |a, &b| a.max(b))),
        mean_per_vm_on_gib: (!on_sizes.is_empty())
            .then(|| on_sizes.iter().sum::<f64>() / on_sizes.len() as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(state: PowerState, count: u32) -> CpuRecord {
        CpuRecord {
            vm_id: "id".to_string(),
            vm_name: "vm".to_string(),
            power_state: state,
            cpu_count: count,
            cluster: "prod".to_string(),
        }
    }

    fn host(core_count: u32) -> HostRecord {
        HostRecord {
            cluster: "prod".to_string(),
            clock_speed_mhz: 2400.0,
            socket_count: 2,
            cores_per_socket: core_count / 2,
            core_count,
            cpu_usage_pct: 30.0,
            memory_mib: 262_144.0,
            memory_usage_pct: 40.0,
            vm_count: 10,
        }
    }

    fn mem(state: PowerState, size_mib: f64) -> MemoryRecord {
        MemoryRecord {
            vm_id: "id".to_string(),
            vm_name: "vm".to_string(),
            power_state: state,
            size_mib,
            cluster: "prod".to_string(),
        }
    }

    #[test]
    fn test_vcpu_overview_power_split() {
        let cpus = vec![
            cpu(PowerState::PoweredOn, 8),
            cpu(PowerState::PoweredOn, 4),
            cpu(PowerState::PoweredOff, 2),
            cpu(PowerState::Suspended, 1),
            cpu(PowerState::Unknown, 16),
        ];
        let overview = vcpu_overview(&cpus, &[host(10), host(10)]);
        assert_eq!(overview.on, 12);
        assert_eq!(overview.off, 2);
        assert_eq!(overview.suspended, 1);
        // Unknown states count toward the total only.
        assert_eq!(overview.total, 31);
        assert_eq!(overview.max_per_vm_on, Some(8));
        assert_eq!(overview.mean_per_vm_on, Some(6.0));
        assert_eq!(overview.per_core_on, Some(0.6));
        // 12 / ((20 / 2) * 1) = 1.2
        assert_eq!(overview.per_core_on_n1, Some(1.2));
        assert_eq!(overview.per_core_total, Some(1.55));
    }

    #[test]
    fn test_single_host_n1_is_zero() {
        let cpus = vec![cpu(PowerState::PoweredOn, 8)];
        let overview = vcpu_overview(&cpus, &[host(10)]);
        assert_eq!(overview.per_core_on_n1, Some(0.0));
        assert_eq!(overview.per_core_total_n1, Some(0.0));
        assert_eq!(overview.per_core_on, Some(0.8));
    }

    #[test]
    fn test_zero_cores_not_computable() {
        let cpus = vec![cpu(PowerState::PoweredOn, 8)];
        let overview = vcpu_overview(&cpus, &[host(0), host(0)]);
        assert_eq!(overview.per_core_on, None);
        assert_eq!(overview.per_core_on_n1, None);
    }

    #[test]
    fn test_no_hosts_n1_is_zero() {
        let cpus = vec![cpu(PowerState::PoweredOn, 8)];
        let overview = vcpu_overview(&cpus, &[]);
        assert_eq!(overview.per_core_on_n1, Some(0.0));
        assert_eq!(overview.per_core_on, None);
    }

    #[test]
    fn test_no_powered_on_vms() {
        let cpus = vec![cpu(PowerState::PoweredOff, 8)];
        let overview = vcpu_overview(&cpus, &[host(10)]);
        assert_eq!(overview.max_per_vm_on, None);
        assert_eq!(overview.mean_per_vm_on, None);
        assert_eq!(overview.per_core_on, Some(0.0));
    }

    #[test]
    fn test_vmemory_overview() {
        let memory = vec![
            mem(PowerState::PoweredOn, 8192.0),
            mem(PowerState::PoweredOn, 4096.0),
            mem(PowerState::PoweredOff, 2048.0),
            mem(PowerState::Suspended, 1024.0),
        ];
        let overview = vmemory_overview(&memory);
        assert_eq!(overview.on_gib, 12.0);
        assert_eq!(overview.off_gib, 2.0);
        assert_eq!(overview.suspended_gib, 1.0);
        assert_eq!(overview.total_gib, 15.0);
        assert_eq!(overview.max_per_vm_on_gib, Some(8.0));
        assert_eq!(overview.mean_per_vm_on_gib, Some(6.0));
    }

    #[test]
    fn test_vmemory_overview_empty() {
        let overview = vmemory_overview(&[]);
        assert_eq!(overview.total_gib, 0.0);
        assert_eq!(overview.max_per_vm_on_gib, None);
        assert_eq!(overview.mean_per_vm_on_gib, None);
    }
}
