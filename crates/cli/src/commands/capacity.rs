//! Cluster capacity summary and host detail commands

use anyhow::Result;
use serde::Serialize;
use vscope_lib::report::{
    cpu_capacity, datastore_capacity, host_cpu_details, host_hardware_details,
    host_memory_details, memory_capacity, CpuCapacity, DatastoreCapacity, HostCpuDetails,
    HostHardwareDetails, HostMemoryDetails, MemoryCapacity,
};

use crate::output::{
    self, format_ghz, format_gib, format_pct, format_tib, MetricRow, OutputFormat,
};
use crate::WorkbookArgs;

#[derive(Serialize)]
struct SummaryReport {
    cpu: CpuCapacity,
    memory: MemoryCapacity,
    datastores: DatastoreCapacity,
}

/// Cluster-level capacity summary across pCPU, pMemory and datastores.
pub fn summary(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = SummaryReport {
        cpu: cpu_capacity(&inventory.hosts),
        memory: memory_capacity(&inventory.hosts),
        datastores: datastore_capacity(&inventory.datastores),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let cpu_rows = vec![
                MetricRow::new("Total", format_ghz(report.cpu.total_ghz)),
                MetricRow::new("Consumed", format_ghz(report.cpu.consumed_ghz)),
                MetricRow::new("Utilization", format_pct(report.cpu.utilization_pct)),
            ];
            output::print_table("pCPU", &cpu_rows);

            let memory_rows = vec![
                MetricRow::new("Total", format_gib(report.memory.total_gib)),
                MetricRow::new("Consumed", format_gib(report.memory.consumed_gib)),
                MetricRow::new("Utilization", format_pct(report.memory.utilization_pct)),
            ];
            output::print_table("pMemory", &memory_rows);

            let datastore_rows = vec![
                MetricRow::new("Provisioned", format_tib(report.datastores.provisioned_tib)),
                MetricRow::new("In use", format_tib(report.datastores.consumed_tib)),
                MetricRow::new("Utilization", format_pct(report.datastores.utilization_pct)),
            ];
            output::print_table("Datastores", &datastore_rows);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct HostsReport {
    cpu: HostCpuDetails,
    memory: HostMemoryDetails,
    hardware: HostHardwareDetails,
}

/// Per-cluster host detail tables (CPU, memory, hardware shape).
pub fn hosts(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = HostsReport {
        cpu: host_cpu_details(&inventory.hosts),
        memory: host_memory_details(&inventory.hosts),
        hardware: host_hardware_details(&inventory.hosts),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let cpu_rows = vec![
                MetricRow::new("Consumed", format_ghz(report.cpu.consumed_ghz)),
                MetricRow::new("Total", format_ghz(report.cpu.total_ghz)),
                MetricRow::new(
                    "Max cores per host",
                    report.cpu.max_cores_per_host.to_string(),
                ),
                MetricRow::new("Max clock", format_ghz(report.cpu.max_clock_ghz)),
                MetricRow::new("Mean clock", format_ghz(report.cpu.mean_clock_ghz)),
                MetricRow::new("Max usage", format!("{:.2} %", report.cpu.max_usage_pct)),
                MetricRow::new("Mean usage", format!("{:.2} %", report.cpu.mean_usage_pct)),
            ];
            output::print_table("Host CPU", &cpu_rows);

            let memory_rows = vec![
                MetricRow::new("Consumed", format_gib(report.memory.consumed_gib)),
                MetricRow::new("Total", format_gib(report.memory.total_gib)),
                MetricRow::new("Largest host", format_gib(report.memory.max_host_gib)),
                MetricRow::new("Max usage", format!("{:.2} %", report.memory.max_usage_pct)),
                MetricRow::new(
                    "Mean usage",
                    format!("{:.2} %", report.memory.mean_usage_pct),
                ),
            ];
            output::print_table("Host memory", &memory_rows);

            let hardware_rows = vec![
                MetricRow::new("Hosts", report.hardware.host_count.to_string()),
                MetricRow::new("Sockets", report.hardware.socket_count.to_string()),
                MetricRow::new("Cores", report.hardware.core_count.to_string()),
                MetricRow::new(
                    "Max VMs per host",
                    report.hardware.max_vms_per_host.to_string(),
                ),
                MetricRow::new(
                    "Mean VMs per host",
                    format!("{:.2}", report.hardware.mean_vms_per_host),
                ),
            ];
            output::print_table("Host hardware", &hardware_rows);
        }
    }

    Ok(())
}
