//! Single-batch pipeline orchestrator.
//!
//! Coordinates the flow from an intact batch through fault injection,
//! metadata-driven selection and topology export to traffic generation for
//! one selected instance. All randomness comes from a single generator
//! seeded from the configuration, consumed in a fixed order.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::analysis::{
    delete_isolated_nodes_batch, generate_json_report, run_sweep, select_candidates,
    write_sweep_reports, BatchStats, SelectionSummary,
};
use crate::config::{Config, ExportConfig};
use crate::fault::{random_error_inject, InjectionSummary};
use crate::topology::{generate_mesh_batch, write_topology_file, DocumentAttributes, MeshGraph};
use crate::traffic::{generate_rounds, schedule_literal, schedule_report, TrafficRound};
use crate::utils::ScopedTimer;

/// Everything produced by [`run_pipeline`]
#[derive(Debug)]
pub struct PipelineOutput {
    pub summary: SelectionSummary,
    pub selected: Vec<MeshGraph>,
    /// Round-major traffic of the chosen instance, if one was available
    pub traffic: Option<Vec<TrafficRound>>,
    pub files: Vec<PathBuf>,
}

/// A freshly built batch after fault injection and optional cleanup
#[derive(Debug)]
pub struct FaultedBatch {
    pub graphs: Vec<MeshGraph>,
    pub injection: InjectionSummary,
    pub isolated_nodes_removed: usize,
}

/// Build the configured batch and apply the configured faults
pub fn build_faulted_batch(config: &Config, rng: &mut ChaCha8Rng) -> FaultedBatch {
    let _timer = ScopedTimer::new(format!(
        "building {} meshes of {}x{}",
        config.mesh.batch_size, config.mesh.size, config.mesh.size
    ));

    let mut graphs = generate_mesh_batch(config.mesh.size, config.mesh.batch_size);
    let injection = random_error_inject(
        &mut graphs,
        config.faults.node_error_rate,
        config.faults.edge_error_rate,
        rng,
    );

    let isolated_nodes_removed = if config.faults.delete_isolated {
        delete_isolated_nodes_batch(&mut graphs)
    } else {
        0
    };

    FaultedBatch {
        graphs,
        injection,
        isolated_nodes_removed,
    }
}

/// Write up to `export.max_topologies` selected instances as graph documents
pub fn export_topologies(
    selected: &[MeshGraph],
    export: &ExportConfig,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let attrs = DocumentAttributes {
        edge_weight: export.edge_weight,
        pipeline_stage_delay: export.pipeline_stage_delay,
    };

    let dir = output_dir.join("topologies");
    selected
        .iter()
        .take(export.max_topologies)
        .enumerate()
        .map(|(i, graph)| -> Result<PathBuf> {
            let name = format!("{}_{}", export.graph_name_prefix, i);
            let path = dir.join(format!("{}.gv", name));
            write_topology_file(&path, &name, attrs, graph)?;
            Ok(path)
        })
        .collect()
}

/// Run the full single-batch pipeline, writing results under `output_dir`
pub fn run_pipeline(config: &Config, output_dir: &Path) -> Result<PipelineOutput> {
    let _timer = ScopedTimer::new("single-batch pipeline");

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.general.seed);
    let batch = build_faulted_batch(config, &mut rng);
    let stats = BatchStats::collect(&batch.graphs);

    let selected = select_candidates(batch.graphs);
    let summary = SelectionSummary {
        mesh_size: config.mesh.size,
        seed: config.general.seed,
        node_error_rate: config.faults.node_error_rate,
        edge_error_rate: config.faults.edge_error_rate,
        injection: batch.injection,
        isolated_nodes_removed: batch.isolated_nodes_removed,
        batch: stats,
        selected: selected.len(),
        selected_scores: selected.iter().map(MeshGraph::score).collect(),
    };

    let mut files = Vec::new();

    let summary_path = output_dir.join("selection.json");
    generate_json_report(&summary, &summary_path)?;
    files.push(summary_path);

    let exported = export_topologies(&selected, &config.export, output_dir)?;
    info!("Exported {} topologies", exported.len());
    files.extend(exported);

    let traffic = match selected.get(config.traffic.graph_index) {
        Some(graph) => {
            let rounds = generate_rounds(
                &mut rng,
                graph,
                config.traffic.layers,
                config.traffic.data_type,
                config.traffic.rounds,
            );

            let literal_path = output_dir.join("traffic.txt");
            let literal = schedule_literal(&rounds)
                .wrap_err("Traffic rounds do not form a rectangular schedule")?;
            fs::write(&literal_path, literal)
                .wrap_err_with(|| format!("Failed to write '{}'", literal_path.display()))?;
            files.push(literal_path);

            let report_path = output_dir.join("traffic_report.txt");
            fs::write(&report_path, schedule_report(&rounds))
                .wrap_err_with(|| format!("Failed to write '{}'", report_path.display()))?;
            files.push(report_path);

            Some(rounds)
        }
        None => {
            warn!(
                "No selected instance at index {} ({} selected), skipping traffic generation",
                config.traffic.graph_index,
                selected.len()
            );
            None
        }
    };

    Ok(PipelineOutput {
        summary,
        selected,
        traffic,
        files,
    })
}

/// Run the configured failure-rate sweep and write one CSV per mesh size.
///
/// Falls back to the default sweep grid when the configuration has no
/// `sweep` section.
pub fn run_sweep_to_dir(config: &Config, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let sweep = config.sweep.clone().unwrap_or_default();
    info!(
        "Sweeping mesh sizes {:?} with {} instances per cell",
        sweep.mesh_sizes, sweep.batch_size
    );

    let results = {
        let _timer = ScopedTimer::new("failure-rate sweep");
        run_sweep(&sweep, config.general.seed)
    };
    write_sweep_reports(&results, output_dir)
}

/// Build a single faulted instance with the configured mesh size and rates
pub fn sample_instance(config: &Config) -> MeshGraph {
    let mut single = config.clone();
    single.mesh.batch_size = 1;
    let mut rng = ChaCha8Rng::seed_from_u64(config.general.seed);
    let batch = build_faulted_batch(&single, &mut rng);
    batch
        .graphs
        .into_iter()
        .next()
        .unwrap_or_else(|| crate::topology::generate_mesh_graph(config.mesh.size))
}
