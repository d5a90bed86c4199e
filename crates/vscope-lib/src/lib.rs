//! Capacity analysis core for virtualization inventory exports
//!
//! This crate provides the core functionality for:
//! - Loading an inventory workbook (XLSX) into typed record tables
//! - Narrowing the inventory to a cluster selection
//! - Capacity, utilization, ranking and distribution reports
//! - Growth-based sizing projections
//!
//! Everything here is synchronous and pure over an immutable [`Inventory`]
//! snapshot; independent snapshots can be processed in parallel by a
//! caller without interference.

pub mod filter;
pub mod models;
pub mod report;
pub mod sizing;
pub mod workbook;

pub use models::{
    CpuRecord, DatastoreRecord, DiskRecord, HostRecord, Inventory, MemoryRecord, PartitionRecord,
    PowerState, VmRecord,
};
pub use sizing::{
    CapacitySizing, CpuSizing, CpuSizingBasis, MemorySizingBasis, SizingState, StorageSizingBasis,
};
pub use workbook::{load_inventory, SchemaError};
