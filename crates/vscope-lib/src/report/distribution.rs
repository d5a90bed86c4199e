//! Histogram bucketing for bar-chart counts

use serde::{Deserialize, Serialize};

use crate::models::{mib_to_gib, CpuRecord, DiskRecord, MemoryRecord};

/// One labeled histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub label: String,
    pub count: usize,
}

/// Upper edges (GiB, inclusive) of the disk capacity buckets.
const DISK_BUCKET_EDGES_GIB: [f64; 5] = [10.0, 100.0, 1024.0, 2048.0, 4096.0];

const DISK_BUCKET_LABELS: [&str; 6] = [
    "0 - 10 GB",
    ">10 - 100 GB",
    ">100 GB - 1 TB",
    ">1 TB - 2 TB",
    ">2 TB - 4 TB",
    "> 4 TB",
];

/// Disk capacity distribution over six fixed ranges. All buckets are
/// always present, including empty ones.
pub fn disk_capacity_histogram(disks: &[DiskRecord]) -> Vec<HistogramBucket> {
    let mut counts = [0usize; 6];
    for disk in disks {
        let gib = mib_to_gib(disk.capacity_mib);
        let idx = DISK_BUCKET_EDGES_GIB
            .iter()
            .position(|edge| gib <= *edge)
            .unwrap_or(DISK_BUCKET_EDGES_GIB.len());
        counts[idx] += 1;
    }
    DISK_BUCKET_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| HistogramBucket {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// VM count per integer GiB memory size present, ascending.
pub fn memory_size_histogram(memory: &[MemoryRecord]) -> Vec<HistogramBucket> {
    let mut sizes: Vec<(u64, usize)> = Vec::new();
    for m in memory {
        let gib = mib_to_gib(m.size_mib) as u64;
        match sizes.iter_mut().find(|(size, _)| *size == gib) {
            Some((_, count)) => *count += 1,
            None => sizes.push((gib, 1)),
        }
    }
    sizes.sort_by_key(|(size, _)| *size);
    sizes
        .into_iter()
        .map(|(size, count)| HistogramBucket {
            label: size.to_string(),
            count,
        })
        .collect()
}

/// VM count per distinct vCPU count present, ascending.
pub fn vcpu_count_histogram(cpus: &[CpuRecord]) -> Vec<HistogramBucket> {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for c in cpus {
        match counts.iter_mut().find(|(cpu, _)| *cpu == c.cpu_count) {
            Some((_, count)) => *count += 1,
            None => counts.push((c.cpu_count, 1)),
        }
    }
    counts.sort_by_key(|(cpu, _)| *cpu);
    counts
        .into_iter()
        .map(|(cpu, count)| HistogramBucket {
            label: cpu.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PowerState, MIB_PER_GIB};

    fn disk(capacity_gib: f64) -> DiskRecord {
        DiskRecord {
            vm_id: "id".to_string(),
            power_state: PowerState::PoweredOn,
            capacity_mib: capacity_gib * MIB_PER_GIB,
            thin: false,
            cluster: "prod".to_string(),
        }
    }

    fn mem(size_mib: f64) -> MemoryRecord {
        MemoryRecord {
            vm_id: "id".to_string(),
            vm_name: "vm".to_string(),
            power_state: PowerState::PoweredOn,
            size_mib,
            cluster: "prod".to_string(),
        }
    }

    fn cpu(count: u32) -> CpuRecord {
        CpuRecord {
            vm_id: "id".to_string(),
            vm_name: "vm".to_string(),
            power_state: PowerState::PoweredOn,
            cpu_count: count,
            cluster: "prod".to_string(),
        }
    }

    #[test]
    fn test_disk_bucket_edges_inclusive() {
        let disks = vec![
            disk(0.0),
            disk(10.0),     // still the first bucket
            disk(10.5),     // second bucket
            disk(100.0),    // second bucket
            disk(1024.0),   // third bucket
            disk(2048.0),   // fourth bucket
            disk(4096.0),   // fifth bucket
            disk(8192.0),   // unbounded last bucket
            disk(100_000.0),
        ];
        let histogram = disk_capacity_histogram(&disks);
        let counts: Vec<usize> = histogram.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 1, 1, 1, 2]);
        assert_eq!(histogram[0].label, "0 - 10 GB");
        assert_eq!(histogram[5].label, "> 4 TB");
    }

    #[test]
    fn test_disk_histogram_empty_keeps_all_buckets() {
        let histogram = disk_capacity_histogram(&[]);
        assert_eq!(histogram.len(), 6);
        assert!(histogram.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_memory_histogram_per_gib_value() {
        let memory = vec![mem(8192.0), mem(4096.0), mem(8192.0), mem(1024.0)];
        let histogram = memory_size_histogram(&memory);
        assert_eq!(
            histogram,
            vec![
                HistogramBucket {
                    label: "1".to_string(),
                    count: 1
                },
                HistogramBucket {
                    label: "4".to_string(),
                    count: 1
                },
                HistogramBucket {
                    label: "8".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_vcpu_histogram_ascending() {
        let cpus = vec![cpu(4), cpu(2), cpu(4), cpu(16)];
        let histogram = vcpu_count_histogram(&cpus);
        let labels: Vec<&str> = histogram.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2", "4", "16"]);
        assert_eq!(histogram[1].count, 2);
    }
}
