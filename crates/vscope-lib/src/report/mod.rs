//! Aggregation engine: pure report functions over filtered tables
//!
//! Every function here is side-effect free, assumes already-filtered
//! well-formed input, and is total over empty tables: zero rows produce
//! zero/empty results and `None` for ratios whose denominator vanishes,
//! never NaN or infinity.

pub mod capacity;
pub mod distribution;
pub mod overview;
pub mod rankings;
pub mod storage;

pub use capacity::{
    cpu_capacity, datastore_capacity, host_cpu_details, host_hardware_details,
    host_memory_details, memory_capacity, CpuCapacity, DatastoreCapacity, HostCpuDetails,
    HostHardwareDetails, HostMemoryDetails, MemoryCapacity,
};
pub use distribution::{
    disk_capacity_histogram, memory_size_histogram, vcpu_count_histogram, HistogramBucket,
};
pub use overview::{vcpu_overview, vmemory_overview, VcpuOverview, VmemoryOverview};
pub use rankings::{
    guest_os_by_config, guest_os_by_tools, top_vms_by_memory, top_vms_by_storage_in_use,
    top_vms_by_vcpu, LabelCount, RankedVm, TOP_VM_COUNT,
};
pub use storage::{
    datastore_summary, disk_summary, partition_summary, vm_guest_storage_summary,
    vm_storage_summary, vms_without_partitions, DatastoreSummary, DiskSummary, PartitionSummary,
    PowerSplit, VmGuestStorageSummary, VmStorageSummary, FALLBACK_CONSUMED_RATIO,
};
