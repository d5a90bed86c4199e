//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// A label/value display row shared by the report tables.
#[derive(Tabled, Serialize)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    pub fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Print a titled table from a list of rows
pub fn print_table<T: Tabled>(title: &str, items: &[T]) {
    println!("\n{}", title.bold());
    if items.is_empty() {
        println!("{}", "No data".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format a GHz quantity
pub fn format_ghz(value: f64) -> String {
    format!("{:.2} GHz", value)
}

/// Format a GiB quantity
pub fn format_gib(value: f64) -> String {
    format!("{:.2} GiB", value)
}

/// Format a TiB quantity
pub fn format_tib(value: f64) -> String {
    format!("{:.2} TiB", value)
}

/// Format an optional percentage; non-computable values render as "n/a"
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(pct) => color_utilization(pct),
        None => "n/a".to_string(),
    }
}

/// Format an optional ratio (e.g. vCPU per core)
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(ratio) => format!("{:.2}", ratio),
        None => "n/a".to_string(),
    }
}

/// Format an optional plain number
pub fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

/// Color a utilization percentage by pressure
fn color_utilization(pct: f64) -> String {
    let formatted = format!("{:.2} %", pct);
    if pct >= 90.0 {
        formatted.red().to_string()
    } else if pct >= 70.0 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}
