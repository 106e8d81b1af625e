//! Resilience analysis over batches of faulted meshes.
//!
//! This module ranks and filters a batch by its cached metadata and runs
//! failure-rate sweeps whose statistics are exported as CSV.

pub mod types;
pub mod selection;
pub mod sweep;
pub mod report;

pub use types::*;
pub use selection::{delete_isolated_nodes_batch, is_candidate, select_candidates, sort_by_score};
pub use sweep::{cell_seed, evaluate_cell, run_sweep, sweep_cells, SweepCell};
pub use report::{generate_json_report, print_summary, sweep_file_name, write_sweep_csv, write_sweep_reports};
