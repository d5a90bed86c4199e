//! vCPU, vMemory and storage overview commands

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;
use vscope_lib::report::{
    datastore_summary, disk_capacity_histogram, disk_summary, memory_size_histogram,
    partition_summary, vcpu_count_histogram, vcpu_overview, vm_guest_storage_summary,
    vm_storage_summary, vmemory_overview, DatastoreSummary, DiskSummary, HistogramBucket,
    PartitionSummary, PowerSplit, VcpuOverview, VmGuestStorageSummary, VmStorageSummary,
    VmemoryOverview,
};

use crate::output::{
    self, format_gib, format_opt, format_pct, format_ratio, format_tib, MetricRow, OutputFormat,
};
use crate::WorkbookArgs;

#[derive(Tabled, Serialize)]
struct BucketRow {
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "VMs")]
    count: usize,
}

fn bucket_rows(buckets: &[HistogramBucket]) -> Vec<BucketRow> {
    buckets
        .iter()
        .map(|b| BucketRow {
            range: b.label.clone(),
            count: b.count,
        })
        .collect()
}

#[derive(Serialize)]
struct CpuReport {
    overview: VcpuOverview,
    histogram: Vec<HistogramBucket>,
}

/// vCPU overview with oversubscription ratios and the vCPU-count
/// distribution.
pub fn cpu(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = CpuReport {
        overview: vcpu_overview(&inventory.cpus, &inventory.hosts),
        histogram: vcpu_count_histogram(&inventory.cpus),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let o = &report.overview;
            let rows = vec![
                MetricRow::new("Powered on", o.on.to_string()),
                MetricRow::new("Powered off", o.off.to_string()),
                MetricRow::new("Suspended", o.suspended.to_string()),
                MetricRow::new("Total", o.total.to_string()),
                MetricRow::new(
                    "Max per powered-on VM",
                    o.max_per_vm_on
                        .map_or_else(|| "n/a".to_string(), |v| v.to_string()),
                ),
                MetricRow::new("Mean per powered-on VM", format_opt(o.mean_per_vm_on)),
                MetricRow::new("vCPU per core (on)", format_ratio(o.per_core_on)),
                MetricRow::new("vCPU per core (on, N-1)", format_ratio(o.per_core_on_n1)),
                MetricRow::new("vCPU per core (total)", format_ratio(o.per_core_total)),
                MetricRow::new(
                    "vCPU per core (total, N-1)",
                    format_ratio(o.per_core_total_n1),
                ),
            ];
            output::print_table("vCPU", &rows);
            output::print_table("vCPU distribution", &bucket_rows(&report.histogram));
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct MemoryReport {
    overview: VmemoryOverview,
    histogram: Vec<HistogramBucket>,
}

/// vMemory overview and the VM memory-size distribution.
pub fn memory(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = MemoryReport {
        overview: vmemory_overview(&inventory.memory),
        histogram: memory_size_histogram(&inventory.memory),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let o = &report.overview;
            let rows = vec![
                MetricRow::new("Powered on", format_gib(o.on_gib)),
                MetricRow::new("Powered off", format_gib(o.off_gib)),
                MetricRow::new("Suspended", format_gib(o.suspended_gib)),
                MetricRow::new("Total", format_gib(o.total_gib)),
                MetricRow::new(
                    "Max per powered-on VM",
                    o.max_per_vm_on_gib
                        .map_or_else(|| "n/a".to_string(), format_gib),
                ),
                MetricRow::new(
                    "Mean per powered-on VM",
                    o.mean_per_vm_on_gib
                        .map_or_else(|| "n/a".to_string(), format_gib),
                ),
            ];
            output::print_table("vMemory", &rows);
            output::print_table("vMemory distribution", &bucket_rows(&report.histogram));
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct StorageReport {
    partitions: PartitionSummary,
    disks: DiskSummary,
    datastores: DatastoreSummary,
    vm_guest: VmGuestStorageSummary,
    vm_storage: VmStorageSummary,
    disk_histogram: Vec<HistogramBucket>,
}

fn split_rows(label: &str, split: &PowerSplit) -> Vec<MetricRow> {
    vec![
        MetricRow::new(&format!("{label} (on)"), format_tib(split.on)),
        MetricRow::new(
            &format!("{label} (off/suspended)"),
            format_tib(split.off_suspended),
        ),
        MetricRow::new(&format!("{label} (total)"), format_tib(split.total)),
    ]
}

/// Storage overviews: guest partitions, virtual disks, datastores and
/// the reconciled per-VM storage summary.
pub fn storage(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = StorageReport {
        partitions: partition_summary(&inventory.partitions),
        disks: disk_summary(&inventory.disks),
        datastores: datastore_summary(&inventory.datastores),
        vm_guest: vm_guest_storage_summary(&inventory.vms),
        vm_storage: vm_storage_summary(&inventory.disks, &inventory.partitions, &inventory.vms),
        disk_histogram: disk_capacity_histogram(&inventory.disks),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let p = &report.partitions;
            let mut rows = vec![
                MetricRow::new("VMs with partitions", p.vm_count.to_string()),
                MetricRow::new("Partitions (on)", p.partitions_on.to_string()),
                MetricRow::new(
                    "Partitions (off/suspended)",
                    p.partitions_off_suspended.to_string(),
                ),
                MetricRow::new("Partitions (total)", p.partitions_total.to_string()),
            ];
            rows.extend(split_rows("Consumed", &p.consumed_tib));
            rows.extend(split_rows("Provisioned", &p.provisioned_tib));
            output::print_table("Guest partitions", &rows);

            let d = &report.disks;
            let mut rows = vec![
                MetricRow::new("VMs with disks", d.vm_count.to_string()),
                MetricRow::new("Disks (on)", d.on.disks.to_string()),
                MetricRow::new("Disks (off/suspended)", d.off_suspended.disks.to_string()),
                MetricRow::new("Disks (total)", d.total.disks.to_string()),
                MetricRow::new("Thin disks (on)", d.on.thin.to_string()),
                MetricRow::new(
                    "Thin disks (off/suspended)",
                    d.off_suspended.thin.to_string(),
                ),
                MetricRow::new("Thin disks (total)", d.total.thin.to_string()),
            ];
            rows.extend(split_rows("Capacity", &d.capacity_tib));
            output::print_table("Virtual disks", &rows);

            let ds = &report.datastores;
            let rows = vec![
                MetricRow::new("Datastores", ds.datastore_count.to_string()),
                MetricRow::new("Capacity", format_tib(ds.capacity_tib)),
                MetricRow::new("Provisioned", format_tib(ds.provisioned_tib)),
                MetricRow::new("In use", format_tib(ds.in_use_tib)),
                MetricRow::new("Free", format_pct(ds.free_pct)),
            ];
            output::print_table("Datastores", &rows);

            let g = &report.vm_guest;
            let mut rows = split_rows("Consumed", &g.consumed_tib);
            rows.extend(split_rows("Provisioned", &g.provisioned_tib));
            output::print_table("VM storage (guest view)", &rows);

            let v = &report.vm_storage;
            let mut rows = vec![
                MetricRow::new("VMs (on)", v.vms_on.to_string()),
                MetricRow::new("VMs (off/suspended)", v.vms_off_suspended.to_string()),
                MetricRow::new("VMs (total)", v.vms_total.to_string()),
            ];
            rows.extend(split_rows("Consumed", &v.consumed_tib));
            rows.extend(split_rows("Provisioned", &v.provisioned_tib));
            output::print_table("VM storage (reconciled)", &rows);

            output::print_table("Disk capacity distribution", &bucket_rows(&report.disk_histogram));
        }
    }

    Ok(())
}
