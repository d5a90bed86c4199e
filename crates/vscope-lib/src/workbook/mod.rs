//! Schema loader: workbook bytes to an [`Inventory`] snapshot
//!
//! The export format carries many sheets; exactly seven are required here,
//! each projected to a fixed column set. A missing sheet or column fails
//! the whole load with a [`SchemaError`] naming the expected schema.
//! Value-level validation is intentionally absent: missing numeric cells
//! read as 0, missing text cells as empty.

mod sheet;

use std::io::{Read, Seek};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{
    CpuRecord, DatastoreRecord, DiskRecord, HostRecord, Inventory, MemoryRecord, PartitionRecord,
    PowerState, VmRecord,
};
use sheet::{Cell, Sheet};

pub const SHEET_VM_INFO: &str = "vInfo";
pub const SHEET_VCPU: &str = "vCPU";
pub const SHEET_VMEMORY: &str = "vMemory";
pub const SHEET_VDISK: &str = "vDisk";
pub const SHEET_VPARTITION: &str = "vPartition";
pub const SHEET_VHOST: &str = "vHost";
pub const SHEET_VDATASTORE: &str = "vDatastore";

/// The sheets a workbook must provide.
pub const REQUIRED_SHEETS: [&str; 7] = [
    SHEET_VM_INFO,
    SHEET_VCPU,
    SHEET_VMEMORY,
    SHEET_VDISK,
    SHEET_VPARTITION,
    SHEET_VHOST,
    SHEET_VDATASTORE,
];

/// Errors raised while loading a workbook into an inventory snapshot.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workbook archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("workbook xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("workbook xml attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),
    #[error("workbook is not parseable: {0}")]
    Unparseable(String),
    #[error("required sheet not found: {0}")]
    MissingSheet(String),
    #[error("sheet {sheet} is missing required column {column:?}")]
    MissingColumn { sheet: String, column: String },
    #[error("sheet {0} has no header row")]
    EmptySheet(String),
    #[error("worksheet part not found for sheet {0}")]
    MissingWorksheetPart(String),
}

/// Parse a workbook into the seven normalized tables.
pub fn load_inventory<R: Read + Seek>(reader: R) -> Result<Inventory, SchemaError> {
    let sheets = sheet::read_sheets(reader, &REQUIRED_SHEETS)?;
    let sheet = |name: &str| {
        sheets
            .get(name)
            .ok_or_else(|| SchemaError::MissingSheet(name.to_string()))
    };

    let inventory = Inventory {
        vms: load_vms(sheet(SHEET_VM_INFO)?)?,
        cpus: load_cpus(sheet(SHEET_VCPU)?)?,
        memory: load_memory(sheet(SHEET_VMEMORY)?)?,
        disks: load_disks(sheet(SHEET_VDISK)?)?,
        partitions: load_partitions(sheet(SHEET_VPARTITION)?)?,
        hosts: load_hosts(sheet(SHEET_VHOST)?)?,
        datastores: load_datastores(sheet(SHEET_VDATASTORE)?)?,
    };
    info!(
        vms = inventory.vms.len(),
        hosts = inventory.hosts.len(),
        datastores = inventory.datastores.len(),
        "loaded inventory workbook"
    );
    Ok(inventory)
}

/// Resolves required column labels to indices for one sheet.
struct Columns<'a> {
    sheet: &'a Sheet,
}

impl<'a> Columns<'a> {
    fn new(sheet: &'a Sheet) -> Self {
        Self { sheet }
    }

    fn require(&self, label: &str) -> Result<usize, SchemaError> {
        self.sheet
            .column(label)
            .ok_or_else(|| SchemaError::MissingColumn {
                sheet: self.sheet.name.clone(),
                column: label.to_string(),
            })
    }
}

fn load_vms(sheet: &Sheet) -> Result<Vec<VmRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let name = cols.require("VM")?;
    let power = cols.require("Powerstate")?;
    let cpus = cols.require("CPUs")?;
    let memory = cols.require("Memory")?;
    let provisioned = cols.require("Provisioned MiB")?;
    let in_use = cols.require("In Use MiB")?;
    let datacenter = cols.require("Datacenter")?;
    let cluster = cols.require("Cluster")?;
    let host = cols.require("Host")?;
    let os_config = cols.require("OS according to the configuration file")?;
    let os_tools = cols.require("OS according to the VMware Tools")?;
    let id = cols.require("VM ID")?;

    let records: Vec<VmRecord> = sheet
        .rows
        .iter()
        .map(|row| VmRecord {
            id: Sheet::cell(row, id).as_string(),
            name: Sheet::cell(row, name).as_string(),
            power_state: PowerState::from_sheet(&Sheet::cell(row, power).as_string()),
            cpu_count: Sheet::cell(row, cpus).as_u32(),
            memory_mib: Sheet::cell(row, memory).as_f64(),
            provisioned_mib: Sheet::cell(row, provisioned).as_f64(),
            in_use_mib: Sheet::cell(row, in_use).as_f64(),
            datacenter: Sheet::cell(row, datacenter).as_string(),
            cluster: Sheet::cell(row, cluster).as_string(),
            host: Sheet::cell(row, host).as_string(),
            guest_os_config: Sheet::cell(row, os_config).as_opt_string(),
            guest_os_tools: Sheet::cell(row, os_tools).as_opt_string(),
        })
        .collect();
    debug!(sheet = %sheet.name, rows = records.len(), "projected sheet");
    Ok(records)
}

fn load_cpus(sheet: &Sheet) -> Result<Vec<CpuRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let name = cols.require("VM")?;
    let power = cols.require("Powerstate")?;
    let cpus = cols.require("CPUs")?;
    let cluster = cols.require("Cluster")?;
    let id = cols.require("VM ID")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| CpuRecord {
            vm_id: Sheet::cell(row, id).as_string(),
            vm_name: Sheet::cell(row, name).as_string(),
            power_state: PowerState::from_sheet(&Sheet::cell(row, power).as_string()),
            cpu_count: Sheet::cell(row, cpus).as_u32(),
            cluster: Sheet::cell(row, cluster).as_string(),
        })
        .collect())
}

fn load_memory(sheet: &Sheet) -> Result<Vec<MemoryRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let name = cols.require("VM")?;
    let power = cols.require("Powerstate")?;
    let size = cols.require("Size MiB")?;
    let cluster = cols.require("Cluster")?;
    let id = cols.require("VM ID")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| MemoryRecord {
            vm_id: Sheet::cell(row, id).as_string(),
            vm_name: Sheet::cell(row, name).as_string(),
            power_state: PowerState::from_sheet(&Sheet::cell(row, power).as_string()),
            size_mib: Sheet::cell(row, size).as_f64(),
            cluster: Sheet::cell(row, cluster).as_string(),
        })
        .collect())
}

fn load_disks(sheet: &Sheet) -> Result<Vec<DiskRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let power = cols.require("Powerstate")?;
    let capacity = cols.require("Capacity MiB")?;
    let thin = cols.require("Thin")?;
    let cluster = cols.require("Cluster")?;
    let id = cols.require("VM ID")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| DiskRecord {
            vm_id: Sheet::cell(row, id).as_string(),
            power_state: PowerState::from_sheet(&Sheet::cell(row, power).as_string()),
            capacity_mib: Sheet::cell(row, capacity).as_f64(),
            thin: Sheet::cell(row, thin).as_bool(),
            cluster: Sheet::cell(row, cluster).as_string(),
        })
        .collect())
}

fn load_partitions(sheet: &Sheet) -> Result<Vec<PartitionRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let power = cols.require("Powerstate")?;
    let capacity = cols.require("Capacity MiB")?;
    let consumed = cols.require("Consumed MiB")?;
    let cluster = cols.require("Cluster")?;
    let id = cols.require("VM ID")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| PartitionRecord {
            vm_id: Sheet::cell(row, id).as_string(),
            power_state: PowerState::from_sheet(&Sheet::cell(row, power).as_string()),
            capacity_mib: Sheet::cell(row, capacity).as_f64(),
            consumed_mib: Sheet::cell(row, consumed).as_f64(),
            cluster: Sheet::cell(row, cluster).as_string(),
        })
        .collect())
}

fn load_hosts(sheet: &Sheet) -> Result<Vec<HostRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let cluster = cols.require("Cluster")?;
    let speed = cols.require("Speed")?;
    let sockets = cols.require("# CPU")?;
    let cores_per_socket = cols.require("Cores per CPU")?;
    let cores = cols.require("# Cores")?;
    let cpu_usage = cols.require("CPU usage %")?;
    let memory = cols.require("# Memory")?;
    let memory_usage = cols.require("Memory usage %")?;
    let vms = cols.require("# VMs")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| HostRecord {
            cluster: Sheet::cell(row, cluster).as_string(),
            clock_speed_mhz: Sheet::cell(row, speed).as_f64(),
            socket_count: Sheet::cell(row, sockets).as_u32(),
            cores_per_socket: Sheet::cell(row, cores_per_socket).as_u32(),
            core_count: Sheet::cell(row, cores).as_u32(),
            cpu_usage_pct: Sheet::cell(row, cpu_usage).as_f64(),
            memory_mib: Sheet::cell(row, memory).as_f64(),
            memory_usage_pct: Sheet::cell(row, memory_usage).as_f64(),
            vm_count: Sheet::cell(row, vms).as_u32(),
        })
        .collect())
}

fn load_datastores(sheet: &Sheet) -> Result<Vec<DatastoreRecord>, SchemaError> {
    let cols = Columns::new(sheet);
    let capacity = cols.require("Capacity MiB")?;
    let provisioned = cols.require("Provisioned MiB")?;
    let in_use = cols.require("In Use MiB")?;
    let object_id = cols.require("Object ID")?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| DatastoreRecord {
            object_id: Sheet::cell(row, object_id).as_string(),
            capacity_mib: Sheet::cell(row, capacity).as_f64(),
            provisioned_mib: Sheet::cell(row, provisioned).as_f64(),
            in_use_mib: Sheet::cell(row, in_use).as_f64(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, header: &[&str], rows: Vec<Vec<Cell>>) -> Sheet {
        Sheet {
            name: name.to_string(),
            header: header.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_missing_column_is_named() {
        let s = sheet("vDatastore", &["Capacity MiB", "Provisioned MiB"], vec![]);
        let err = load_datastores(&s).unwrap_err();
        match err {
            SchemaError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, "vDatastore");
                assert_eq!(column, "In Use MiB");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_host_row_projection() {
        let s = sheet(
            "vHost",
            &[
                "Cluster",
                "Speed",
                "# CPU",
                "Cores per CPU",
                "# Cores",
                "CPU usage %",
                "# Memory",
                "Memory usage %",
                "# VMs",
            ],
            vec![vec![
                Cell::Text("prod".to_string()),
                Cell::Number(2400.0),
                Cell::Number(2.0),
                Cell::Number(10.0),
                Cell::Number(20.0),
                Cell::Empty,
                Cell::Number(262144.0),
                Cell::Number(40.0),
                Cell::Number(35.0),
            ]],
        );
        let hosts = load_hosts(&s).unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].cluster, "prod");
        assert_eq!(hosts[0].core_count, 20);
        // Missing usage cells coerce to zero rather than poisoning aggregates.
        assert_eq!(hosts[0].cpu_usage_pct, 0.0);
        assert_eq!(hosts[0].vm_count, 35);
    }

    #[test]
    fn test_guest_os_empty_is_none() {
        let header = [
            "VM",
            "Powerstate",
            "CPUs",
            "Memory",
            "Provisioned MiB",
            "In Use MiB",
            "Datacenter",
            "Cluster",
            "Host",
            "OS according to the configuration file",
            "OS according to the VMware Tools",
            "VM ID",
        ];
        let s = sheet(
            "vInfo",
            &header,
            vec![vec![
                Cell::Text("vm-a".to_string()),
                Cell::Text("poweredOn".to_string()),
                Cell::Number(4.0),
                Cell::Number(8192.0),
                Cell::Number(102400.0),
                Cell::Number(51200.0),
                Cell::Text("dc1".to_string()),
                Cell::Text("prod".to_string()),
                Cell::Text("esx-01".to_string()),
                Cell::Text("Ubuntu Linux (64-bit)".to_string()),
                Cell::Empty,
                Cell::Text("vm-1001".to_string()),
            ]],
        );
        let vms = load_vms(&s).unwrap();
        assert_eq!(vms[0].guest_os_config.as_deref(), Some("Ubuntu Linux (64-bit)"));
        assert_eq!(vms[0].guest_os_tools, None);
        assert_eq!(vms[0].power_state, PowerState::PoweredOn);
    }
}
