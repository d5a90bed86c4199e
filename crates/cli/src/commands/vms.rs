//! Largest-VM rankings and guest OS distribution command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;
use vscope_lib::report::{
    guest_os_by_config, guest_os_by_tools, top_vms_by_memory, top_vms_by_storage_in_use,
    top_vms_by_vcpu, LabelCount, RankedVm,
};

use crate::output::{self, format_gib, format_tib, OutputFormat};
use crate::WorkbookArgs;

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "VM")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn ranked_rows(vms: &[RankedVm], render: fn(f64) -> String) -> Vec<RankedRow> {
    vms.iter()
        .enumerate()
        .map(|(i, vm)| RankedRow {
            rank: i + 1,
            name: vm.name.clone(),
            value: render(vm.value),
        })
        .collect()
}

#[derive(Tabled)]
struct OsRow {
    #[tabled(rename = "Guest OS")]
    label: String,
    #[tabled(rename = "VMs")]
    count: usize,
}

fn os_rows(counts: &[LabelCount]) -> Vec<OsRow> {
    counts
        .iter()
        .map(|c| OsRow {
            label: c.label.clone(),
            count: c.count,
        })
        .collect()
}

#[derive(Serialize)]
struct TopReport {
    by_vcpu: Vec<RankedVm>,
    by_memory: Vec<RankedVm>,
    by_storage_in_use: Vec<RankedVm>,
    guest_os_config: Vec<LabelCount>,
    guest_os_tools: Vec<LabelCount>,
}

/// Top-10 rankings plus the two guest OS distributions.
pub fn top(args: &WorkbookArgs, format: OutputFormat) -> Result<()> {
    let inventory = super::load_selection(args)?;

    let report = TopReport {
        by_vcpu: top_vms_by_vcpu(&inventory.vms),
        by_memory: top_vms_by_memory(&inventory.vms),
        by_storage_in_use: top_vms_by_storage_in_use(&inventory.vms),
        guest_os_config: guest_os_by_config(&inventory.vms),
        guest_os_tools: guest_os_by_tools(&inventory.vms),
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            output::print_table(
                "Top VMs by vCPU (powered on)",
                &ranked_rows(&report.by_vcpu, |v| format!("{} vCPU", v as u64)),
            );
            output::print_table(
                "Top VMs by memory (powered on)",
                &ranked_rows(&report.by_memory, format_gib),
            );
            output::print_table(
                "Top VMs by storage in use",
                &ranked_rows(&report.by_storage_in_use, format_tib),
            );
            output::print_table(
                "Guest OS (configuration file)",
                &os_rows(&report.guest_os_config),
            );
            output::print_table("Guest OS (VMware Tools)", &os_rows(&report.guest_os_tools));
        }
    }

    Ok(())
}
