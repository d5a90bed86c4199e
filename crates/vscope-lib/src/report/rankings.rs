//! Top-N VM rankings and guest OS distributions

use serde::{Deserialize, Serialize};

use crate::models::{mib_to_gib, mib_to_tib, VmRecord};

/// Ranking depth for the "largest VMs" tables.
pub const TOP_VM_COUNT: usize = 10;

/// One entry of a largest-VMs ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVm {
    pub name: String,
    pub value: f64,
}

/// Largest powered-on VMs by vCPU count.
pub fn top_vms_by_vcpu(vms: &[VmRecord]) -> Vec<RankedVm> {
    top_n(
        vms.iter().filter(|v| v.power_state.is_on()),
        |v| v.cpu_count as f64,
    )
}

/// Largest powered-on VMs by memory size (GiB).
pub fn top_vms_by_memory(vms: &[VmRecord]) -> Vec<RankedVm> {
    top_n(
        vms.iter().filter(|v| v.power_state.is_on()),
        |v| mib_to_gib(v.memory_mib),
    )
}

/// Largest VMs by in-use storage (TiB), regardless of power state.
pub fn top_vms_by_storage_in_use(vms: &[VmRecord]) -> Vec<RankedVm> {
    top_n(vms.iter(), |v| mib_to_tib(v.in_use_mib))
}

/// Stable descending sort keeps ties in input row order.
fn top_n<'a>(
    vms: impl Iterator<Item = &'a VmRecord>,
    value: impl Fn(&VmRecord) -> f64,
) -> Vec<RankedVm> {
    let mut ranked: Vec<RankedVm> = vms
        .map(|v| RankedVm {
            name: v.name.clone(),
            value: value(v),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(TOP_VM_COUNT);
    ranked
}

/// One label of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Guest OS distribution by the configuration-file field.
pub fn guest_os_by_config(vms: &[VmRecord]) -> Vec<LabelCount> {
    value_counts(vms.iter().filter_map(|v| v.guest_os_config.as_deref()))
}

/// Guest OS distribution by the guest-tools field.
pub fn guest_os_by_tools(vms: &[VmRecord]) -> Vec<LabelCount> {
    value_counts(vms.iter().filter_map(|v| v.guest_os_tools.as_deref()))
}

/// Frequency count in descending order; equal counts keep first-seen order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|c| c.label == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount {
                label: value.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerState;

    fn vm(name: &str, on: bool, cpus: u32, memory_mib: f64, in_use_mib: f64) -> VmRecord {
        VmRecord {
            id: format!("id-{name}"),
            name: name.to_string(),
            power_state: if on {
                PowerState::PoweredOn
            } else {
                PowerState::PoweredOff
            },
            cpu_count: cpus,
            memory_mib,
            provisioned_mib: 0.0,
            in_use_mib,
            datacenter: "dc1".to_string(),
            cluster: "prod".to_string(),
            host: "esx-01".to_string(),
            guest_os_config: None,
            guest_os_tools: None,
        }
    }

    #[test]
    fn test_top_vcpu_excludes_powered_off() {
        let vms = vec![
            vm("big-off", false, 64, 0.0, 0.0),
            vm("small-on", true, 2, 0.0, 0.0),
            vm("mid-on", true, 8, 0.0, 0.0),
        ];
        let top = top_vms_by_vcpu(&vms);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "mid-on");
        assert_eq!(top[1].name, "small-on");
    }

    #[test]
    fn test_top_n_descending_and_capped() {
        let vms: Vec<VmRecord> = (0..15)
            .map(|i| vm(&format!("vm-{i}"), true, i as u32, 0.0, 0.0))
            .collect();
        let top = top_vms_by_vcpu(&vms);
        assert_eq!(top.len(), TOP_VM_COUNT);
        for pair in top.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        assert_eq!(top[0].name, "vm-14");
    }

    #[test]
    fn test_ties_keep_row_order() {
        let vms = vec![
            vm("first", true, 4, 0.0, 0.0),
            vm("second", true, 4, 0.0, 0.0),
            vm("third", true, 8, 0.0, 0.0),
        ];
        let top = top_vms_by_vcpu(&vms);
        assert_eq!(top[0].name, "third");
        assert_eq!(top[1].name, "first");
        assert_eq!(top[2].name, "second");
    }

    #[test]
    fn test_top_storage_includes_all_power_states() {
        let vms = vec![
            vm("off", false, 1, 0.0, 2_097_152.0),
            vm("on", true, 1, 0.0, 1_048_576.0),
        ];
        let top = top_vms_by_storage_in_use(&vms);
        assert_eq!(top[0].name, "off");
        assert_eq!(top[0].value, 2.0);
    }

    #[test]
    fn test_top_memory_in_gib() {
        let vms = vec![vm("a", true, 1, 8192.0, 0.0)];
        let top = top_vms_by_memory(&vms);
        assert_eq!(top[0].value, 8.0);
    }

    #[test]
    fn test_guest_os_counts_skip_missing() {
        let mut a = vm("a", true, 1, 0.0, 0.0);
        a.guest_os_config = Some("Ubuntu".to_string());
        let mut b = vm("b", true, 1, 0.0, 0.0);
        b.guest_os_config = Some("Windows".to_string());
        let mut c = vm("c", true, 1, 0.0, 0.0);
        c.guest_os_config = Some("Windows".to_string());
        let d = vm("d", true, 1, 0.0, 0.0);

        let counts = guest_os_by_config(&[a, b, c, d]);
        assert_eq!(
            counts,
            vec![
                LabelCount {
                    label: "Windows".to_string(),
                    count: 2
                },
                LabelCount {
                    label: "Ubuntu".to_string(),
                    count: 1
                },
            ]
        );
        assert!(guest_os_by_tools(&[]).is_empty());
    }
}
