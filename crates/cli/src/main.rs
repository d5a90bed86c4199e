//! Virtualization inventory capacity CLI
//!
//! A command-line front end for the vscope analysis core: loads an
//! inventory workbook export, narrows it to a cluster selection and
//! renders capacity, utilization and sizing reports.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{capacity, resources, sizing, vms};

/// Virtualization inventory capacity CLI
#[derive(Parser)]
#[command(name = "vscope")]
#[command(author, version, about = "Capacity reports over virtualization inventory exports", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Workbook path plus the cluster selection shared by every subcommand.
#[derive(Args)]
pub struct WorkbookArgs {
    /// Path to the inventory workbook (.xlsx)
    pub workbook: PathBuf,

    /// Restrict the analysis to a cluster; repeatable. Defaults to all
    /// clusters in the workbook.
    #[arg(long = "cluster", value_name = "NAME")]
    pub clusters: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster capacity summary (pCPU, pMemory, datastores)
    Summary(WorkbookArgs),

    /// Host detail tables (CPU, memory, hardware)
    Hosts(WorkbookArgs),

    /// vCPU overview with oversubscription ratios
    Cpu(WorkbookArgs),

    /// vMemory overview
    Memory(WorkbookArgs),

    /// Storage overview (partitions, disks, datastores, unified VM storage)
    Storage(WorkbookArgs),

    /// Largest-VM rankings and guest OS distributions
    Top(WorkbookArgs),

    /// Growth-based sizing projections
    Sizing(sizing::SizingArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Summary(args) => capacity::summary(&args, cli.format),
        Commands::Hosts(args) => capacity::hosts(&args, cli.format),
        Commands::Cpu(args) => resources::cpu(&args, cli.format),
        Commands::Memory(args) => resources::memory(&args, cli.format),
        Commands::Storage(args) => resources::storage(&args, cli.format),
        Commands::Top(args) => vms::top(&args, cli.format),
        Commands::Sizing(args) => sizing::run(&args, cli.format),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
