//! Report generation for resilience analysis.
//!
//! Sweep results go to one CSV file per mesh size; selection summaries go
//! to JSON.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use super::types::*;

/// File name of the CSV holding one mesh size's sweep rows
pub fn sweep_file_name(mesh_size: usize) -> String {
    format!("heatmap_data_k{}.csv", mesh_size)
}

/// Write sweep rows as CSV, sorted by (node rate, edge rate)
pub fn write_sweep_csv(result: &SweepResult, output_path: &Path) -> Result<()> {
    let mut rows = result.rows.clone();
    rows.sort_by(|a, b| {
        a.node_error_rate_pct
            .total_cmp(&b.node_error_rate_pct)
            .then(a.edge_error_rate_pct.total_cmp(&b.edge_error_rate_pct))
    });

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create CSV file {}", output_path.display()))?;
    for row in &rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", output_path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", output_path.display()))?;

    log::info!("Sweep data written to {}", output_path.display());
    Ok(())
}

/// Write every mesh size's CSV into `output_dir`; returns the files written
pub fn write_sweep_reports(results: &[SweepResult], output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    results
        .iter()
        .map(|result| -> Result<PathBuf> {
            let path = output_dir.join(sweep_file_name(result.mesh_size));
            write_sweep_csv(result, &path)?;
            Ok(path)
        })
        .collect()
}

/// Write a selection summary as pretty JSON
pub fn generate_json_report(summary: &SelectionSummary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .context("Failed to serialize selection summary to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Print a short human-readable summary to stdout
pub fn print_summary(summary: &SelectionSummary) {
    println!("{}", "=".repeat(60));
    println!(
        "Mesh {}x{} x {} instances (seed {})",
        summary.mesh_size, summary.mesh_size, summary.batch.total, summary.seed
    );
    println!(
        "Fault rates: node {:.2}%, edge {:.2}%",
        summary.node_error_rate * 100.0,
        summary.edge_error_rate * 100.0
    );
    println!(
        "Removed: {} links, {} nodes, {} isolated nodes",
        summary.injection.removed_links,
        summary.injection.removed_nodes,
        summary.isolated_nodes_removed
    );
    println!(
        "With subgraphs: {:.2}%  Incomplete: {:.2}%",
        summary.batch.pct_with_subgraphs(),
        summary.batch.pct_incomplete()
    );
    println!("Selected instances: {}", summary.selected);
    println!("{}", "=".repeat(60));
}
