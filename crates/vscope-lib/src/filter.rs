//! Cluster selection over an inventory snapshot

use std::collections::HashSet;

use tracing::debug;

use crate::models::Inventory;

impl Inventory {
    /// Sorted distinct cluster names, taken from the host table.
    pub fn cluster_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .hosts
            .iter()
            .map(|h| h.cluster.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    /// Narrow the snapshot to the selected clusters.
    ///
    /// Applied to the six cluster-attributed tables; datastores carry no
    /// cluster field and pass through unchanged. An empty selection yields
    /// empty filterable tables, which is a valid "nothing to analyze"
    /// state rather than an error.
    pub fn filter_clusters(&self, selection: &HashSet<String>) -> Inventory {
        let filtered = Inventory {
            vms: self
                .vms
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            cpus: self
                .cpus
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            memory: self
                .memory
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            disks: self
                .disks
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            partitions: self
                .partitions
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            hosts: self
                .hosts
                .iter()
                .filter(|r| selection.contains(&r.cluster))
                .cloned()
                .collect(),
            datastores: self.datastores.clone(),
        };
        debug!(
            clusters = selection.len(),
            vms = filtered.vms.len(),
            hosts = filtered.hosts.len(),
            "applied cluster selection"
        );
        filtered
    }
}
