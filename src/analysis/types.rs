//! Core data types for batch resilience analysis.

use serde::{Deserialize, Serialize};

use crate::fault::InjectionSummary;
use crate::topology::MeshGraph;

/// Metadata counts over a batch of instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    /// Instances whose alive subgraph has more than one component
    pub with_subgraphs: usize,
    /// Instances whose score is below the intact mesh score
    pub incomplete: usize,
    /// Instances with at least one tombstoned node
    pub missing_nodes: usize,
}

impl BatchStats {
    pub fn collect(graphs: &[MeshGraph]) -> Self {
        graphs.iter().fold(
            Self {
                total: graphs.len(),
                ..Self::default()
            },
            |mut stats, g| {
                stats.with_subgraphs += usize::from(g.has_subgraphs());
                stats.incomplete += usize::from(!g.is_full());
                stats.missing_nodes += usize::from(!g.is_all_nodes_exist());
                stats
            },
        )
    }

    /// Percentage of instances with subgraphs
    pub fn pct_with_subgraphs(&self) -> f64 {
        percent(self.with_subgraphs, self.total)
    }

    /// Percentage of incomplete instances
    pub fn pct_incomplete(&self) -> f64 {
        percent(self.incomplete, self.total)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// One cell of a failure-rate sweep, as written to CSV
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    #[serde(rename = "node_error_rate")]
    pub node_error_rate_pct: f64,
    #[serde(rename = "edge_error_rate")]
    pub edge_error_rate_pct: f64,
    #[serde(rename = "sub_graphs_rate")]
    pub pct_with_subgraphs: f64,
    #[serde(rename = "incomplete_graphs_rate")]
    pub pct_incomplete: f64,
}

/// All sweep rows of one mesh size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub mesh_size: usize,
    pub rows: Vec<SweepRow>,
}

/// Outcome of the single-batch selection pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub mesh_size: usize,
    pub seed: u64,
    pub node_error_rate: f64,
    pub edge_error_rate: f64,
    pub injection: InjectionSummary,
    pub isolated_nodes_removed: usize,
    /// Metadata counts before filtering
    pub batch: BatchStats,
    pub selected: usize,
    /// Scores of the selected instances, ascending
    pub selected_scores: Vec<usize>,
}
