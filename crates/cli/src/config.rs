//! Sizing defaults from the environment

use anyhow::Result;
use serde::Deserialize;

/// Default sizing parameters, overridable via `VSCOPE_*` environment
/// variables (e.g. `VSCOPE_CPU_GROWTH_PCT=25`). Command-line flags win
/// over these.
#[derive(Debug, Clone, Deserialize)]
pub struct SizingDefaults {
    /// vCPU growth percentage
    #[serde(default = "default_cpu_growth")]
    pub cpu_growth_pct: u32,

    /// vMemory growth percentage
    #[serde(default = "default_memory_growth")]
    pub memory_growth_pct: u32,

    /// VM storage growth percentage
    #[serde(default = "default_storage_growth")]
    pub storage_growth_pct: u32,

    /// vCPU baseline: "on" or "total"
    #[serde(default = "default_cpu_basis")]
    pub cpu_basis: String,

    /// vMemory baseline: "on" or "total"
    #[serde(default = "default_memory_basis")]
    pub memory_basis: String,

    /// Storage baseline: "consumed-total", "consumed-on",
    /// "provisioned-total" or "provisioned-on"
    #[serde(default = "default_storage_basis")]
    pub storage_basis: String,
}

fn default_cpu_growth() -> u32 {
    10
}

fn default_memory_growth() -> u32 {
    30
}

fn default_storage_growth() -> u32 {
    20
}

fn default_cpu_basis() -> String {
    "on".to_string()
}

fn default_memory_basis() -> String {
    "on".to_string()
}

fn default_storage_basis() -> String {
    "consumed-total".to_string()
}

impl Default for SizingDefaults {
    fn default() -> Self {
        Self {
            cpu_growth_pct: default_cpu_growth(),
            memory_growth_pct: default_memory_growth(),
            storage_growth_pct: default_storage_growth(),
            cpu_basis: default_cpu_basis(),
            memory_basis: default_memory_basis(),
            storage_basis: default_storage_basis(),
        }
    }
}

impl SizingDefaults {
    /// Load defaults from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("VSCOPE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
