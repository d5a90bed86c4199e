//! Growth-based sizing command

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::debug;
use vscope_lib::report::{vcpu_overview, vm_storage_summary, vmemory_overview};
use vscope_lib::{
    CapacitySizing, CpuSizing, CpuSizingBasis, MemorySizingBasis, SizingState, StorageSizingBasis,
};

use crate::config::SizingDefaults;
use crate::output::{self, MetricRow, OutputFormat};
use crate::WorkbookArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CpuBasisArg {
    /// Powered-on vCPUs
    On,
    /// All configured vCPUs
    Total,
}

impl From<CpuBasisArg> for CpuSizingBasis {
    fn from(arg: CpuBasisArg) -> Self {
        match arg {
            CpuBasisArg::On => CpuSizingBasis::PoweredOn,
            CpuBasisArg::Total => CpuSizingBasis::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MemoryBasisArg {
    /// Powered-on vMemory
    On,
    /// All configured vMemory
    Total,
}

impl From<MemoryBasisArg> for MemorySizingBasis {
    fn from(arg: MemoryBasisArg) -> Self {
        match arg {
            MemoryBasisArg::On => MemorySizingBasis::PoweredOn,
            MemoryBasisArg::Total => MemorySizingBasis::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StorageBasisArg {
    /// Consumed storage, all VMs
    ConsumedTotal,
    /// Consumed storage, powered-on VMs
    ConsumedOn,
    /// Provisioned storage, all VMs
    ProvisionedTotal,
    /// Provisioned storage, powered-on VMs
    ProvisionedOn,
}

impl From<StorageBasisArg> for StorageSizingBasis {
    fn from(arg: StorageBasisArg) -> Self {
        match arg {
            StorageBasisArg::ConsumedTotal => StorageSizingBasis::ConsumedTotal,
            StorageBasisArg::ConsumedOn => StorageSizingBasis::ConsumedOn,
            StorageBasisArg::ProvisionedTotal => StorageSizingBasis::ProvisionedTotal,
            StorageBasisArg::ProvisionedOn => StorageSizingBasis::ProvisionedOn,
        }
    }
}

/// Arguments for the sizing subcommand. Flags omitted on the command
/// line fall back to the `VSCOPE_*` environment defaults.
#[derive(Args)]
pub struct SizingArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// vCPU baseline
    #[arg(long, value_enum)]
    pub cpu_basis: Option<CpuBasisArg>,

    /// vCPU growth percentage (0-100)
    #[arg(long)]
    pub cpu_growth: Option<u32>,

    /// vMemory baseline
    #[arg(long, value_enum)]
    pub memory_basis: Option<MemoryBasisArg>,

    /// vMemory growth percentage (0-100)
    #[arg(long)]
    pub memory_growth: Option<u32>,

    /// VM storage baseline
    #[arg(long, value_enum)]
    pub storage_basis: Option<StorageBasisArg>,

    /// VM storage growth percentage (0-100)
    #[arg(long)]
    pub storage_growth: Option<u32>,
}

fn parse_default<T: ValueEnum>(value: &str, flag: &str) -> Result<T> {
    T::from_str(value, true).map_err(|_| anyhow!("invalid default for {flag}: '{value}'"))
}

#[derive(Serialize)]
struct SizingReport {
    cpu: CpuSizing,
    memory: CapacitySizing,
    storage: CapacitySizing,
}

/// Compute vCPU, vMemory and VM storage projections for the selection.
pub fn run(args: &SizingArgs, format: OutputFormat) -> Result<()> {
    let defaults = SizingDefaults::load()?;
    let cpu_basis: CpuBasisArg = match args.cpu_basis {
        Some(basis) => basis,
        None => parse_default(&defaults.cpu_basis, "cpu basis")?,
    };
    let memory_basis: MemoryBasisArg = match args.memory_basis {
        Some(basis) => basis,
        None => parse_default(&defaults.memory_basis, "memory basis")?,
    };
    let storage_basis: StorageBasisArg = match args.storage_basis {
        Some(basis) => basis,
        None => parse_default(&defaults.storage_basis, "storage basis")?,
    };
    let cpu_growth = args.cpu_growth.unwrap_or(defaults.cpu_growth_pct);
    let memory_growth = args.memory_growth.unwrap_or(defaults.memory_growth_pct);
    let storage_growth = args.storage_growth.unwrap_or(defaults.storage_growth_pct);
    debug!(cpu_growth, memory_growth, storage_growth, "sizing parameters");

    let inventory = super::load_selection(&args.workbook)?;

    let vcpu = vcpu_overview(&inventory.cpus, &inventory.hosts);
    let vmemory = vmemory_overview(&inventory.memory);
    let storage = vm_storage_summary(&inventory.disks, &inventory.partitions, &inventory.vms);

    let mut state = SizingState::default();
    state.apply_cpu(&vcpu, cpu_basis.into(), cpu_growth);
    state.apply_memory(&vmemory, memory_basis.into(), memory_growth);
    state.apply_storage(&storage, storage_basis.into(), storage_growth);

    let report = SizingReport {
        cpu: state.cpu.clone().ok_or_else(|| anyhow!("missing cpu sizing"))?,
        memory: state
            .memory
            .clone()
            .ok_or_else(|| anyhow!("missing memory sizing"))?,
        storage: state
            .storage
            .clone()
            .ok_or_else(|| anyhow!("missing storage sizing"))?,
    };

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            let rows = vec![
                MetricRow::new("Basis", format!("{} vCPU", report.cpu.basis)),
                MetricRow::new("Growth", format!("{cpu_growth} %")),
                MetricRow::new("Projected", format!("{} vCPU", report.cpu.projected)),
                MetricRow::new("Delta", format!("{} vCPU", report.cpu.delta)),
            ];
            output::print_table("vCPU sizing", &rows);

            let rows = vec![
                MetricRow::new("Basis", format!("{:.2} GiB", report.memory.basis)),
                MetricRow::new("Growth", format!("{memory_growth} %")),
                MetricRow::new("Projected", format!("{} GiB", report.memory.projected)),
                MetricRow::new("Delta", format!("{:.2} GiB", report.memory.delta)),
            ];
            output::print_table("vMemory sizing", &rows);

            let rows = vec![
                MetricRow::new("Basis", format!("{:.2} TiB", report.storage.basis)),
                MetricRow::new("Growth", format!("{storage_growth} %")),
                MetricRow::new("Projected", format!("{} TiB", report.storage.projected)),
                MetricRow::new("Delta", format!("{:.2} TiB", report.storage.delta)),
            ];
            output::print_table("VM storage sizing", &rows);
        }
    }

    Ok(())
}
