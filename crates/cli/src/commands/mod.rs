//! Subcommand implementations

pub mod capacity;
pub mod resources;
pub mod sizing;
pub mod vms;

use std::collections::HashSet;
use std::fs::File;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use vscope_lib::{load_inventory, Inventory};

use crate::output;
use crate::WorkbookArgs;

/// Load the workbook and narrow it to the requested cluster selection.
///
/// An empty `--cluster` list selects every cluster in the workbook.
/// Unknown cluster names are reported but not fatal; an empty match is
/// a valid (empty) inventory.
pub fn load_selection(args: &WorkbookArgs) -> Result<Inventory> {
    let file = File::open(&args.workbook)
        .with_context(|| format!("failed to open {}", args.workbook.display()))?;
    let inventory = load_inventory(file)
        .with_context(|| format!("failed to load {}", args.workbook.display()))?;

    let known = inventory.cluster_names();
    let selection: HashSet<String> = if args.clusters.is_empty() {
        known.into_iter().collect()
    } else {
        for name in &args.clusters {
            if !known.contains(name) {
                output::print_warning(&format!("cluster '{name}' not found in workbook"));
            }
        }
        args.clusters.iter().cloned().collect()
    };
    debug!(clusters = selection.len(), "applying cluster selection");

    let filtered = inventory.filter_clusters(&selection);
    if filtered.hosts.is_empty() {
        warn!("selection matches no hosts");
    }
    Ok(filtered)
}
