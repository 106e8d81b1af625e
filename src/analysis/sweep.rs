//! Failure-rate sweeps over mesh sizes.
//!
//! Every (mesh size, node rate, edge rate) cell builds its own batch and
//! owns a private generator derived from the base seed, so cells run in
//! parallel and the output does not depend on scheduling.

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::selection::delete_isolated_nodes_batch;
use super::types::{BatchStats, SweepResult, SweepRow};
use crate::config::SweepConfig;
use crate::fault::random_error_inject;
use crate::topology::generate_mesh_graph;
use crate::utils::ScopedTimer;

/// Parameters of a single sweep cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepCell {
    pub mesh_size: usize,
    pub node_error_rate: f64,
    pub edge_error_rate: f64,
    /// Position of the cell within its mesh size, used for seeding
    pub index: usize,
}

/// Seed of one cell's private generator
pub fn cell_seed(base: u64, mesh_size: usize, index: usize) -> u64 {
    base ^ (mesh_size as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_add(1).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

/// All cells of one mesh size, node rate major
pub fn sweep_cells(sweep: &SweepConfig, mesh_size: usize) -> Vec<SweepCell> {
    let edge_rates = sweep.edge_error_rates.values();
    sweep
        .node_error_rates
        .values()
        .into_iter()
        .flat_map(|node_rate| edge_rates.iter().map(move |&edge_rate| (node_rate, edge_rate)))
        .enumerate()
        .map(|(index, (node_error_rate, edge_error_rate))| SweepCell {
            mesh_size,
            node_error_rate,
            edge_error_rate,
            index,
        })
        .collect()
}

/// Build, fault and measure one batch
pub fn evaluate_cell(
    cell: &SweepCell,
    batch_size: usize,
    delete_isolated: bool,
    seed: u64,
) -> SweepRow {
    let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(seed, cell.mesh_size, cell.index));

    // Already inside a parallel cell: build the batch sequentially
    let mut graphs: Vec<_> = (0..batch_size)
        .map(|_| generate_mesh_graph(cell.mesh_size))
        .collect();
    random_error_inject(&mut graphs, cell.node_error_rate, cell.edge_error_rate, &mut rng);
    if delete_isolated {
        delete_isolated_nodes_batch(&mut graphs);
    }

    let stats = BatchStats::collect(&graphs);
    info!(
        "size {} node rate {:.2}% edge rate {:.2}%: subgraphs {:.4}%, incomplete {:.4}%",
        cell.mesh_size,
        cell.node_error_rate * 100.0,
        cell.edge_error_rate * 100.0,
        stats.pct_with_subgraphs(),
        stats.pct_incomplete()
    );

    SweepRow {
        node_error_rate_pct: cell.node_error_rate * 100.0,
        edge_error_rate_pct: cell.edge_error_rate * 100.0,
        pct_with_subgraphs: stats.pct_with_subgraphs(),
        pct_incomplete: stats.pct_incomplete(),
    }
}

/// Run the full sweep; one result per mesh size, in configuration order
pub fn run_sweep(sweep: &SweepConfig, seed: u64) -> Vec<SweepResult> {
    sweep
        .mesh_sizes
        .iter()
        .map(|&mesh_size| {
            let _timer = ScopedTimer::new(format!("sweep of {}x{} meshes", mesh_size, mesh_size));
            let rows = sweep_cells(sweep, mesh_size)
                .par_iter()
                .map(|cell| evaluate_cell(cell, sweep.batch_size, sweep.delete_isolated, seed))
                .collect();
            SweepResult { mesh_size, rows }
        })
        .collect()
}
