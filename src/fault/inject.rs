//! Batch-level fault injection.
//!
//! Failure counts are computed over the whole batch rather than per
//! instance: with `B` instances of `N` nodes and `E` links, exactly
//! `round(B*E*edge_rate)` distinct links and `round(B*N*node_rate)`
//! distinct node slots are targeted. Links go first because deleting a
//! node also detaches its links and would shrink the link population
//! being sampled.

use log::{debug, info, warn};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::topology::MeshGraph;

/// What an injection pass targeted and what it actually removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionSummary {
    pub targeted_links: usize,
    pub removed_links: usize,
    pub targeted_nodes: usize,
    pub removed_nodes: usize,
}

/// Number of failures for a population at a given rate
fn target_count(population: usize, rate: f64) -> usize {
    let rate = if (0.0..=1.0).contains(&rate) {
        rate
    } else {
        warn!("Error rate {} outside [0, 1], clamping", rate);
        if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, 1.0)
        }
    };
    ((population as f64 * rate).round() as usize).min(population)
}

/// Draw `amount` distinct indices from `0..population`, ascending
fn sample_sorted<R: Rng + ?Sized>(rng: &mut R, population: usize, amount: usize) -> Vec<usize> {
    let mut picked = index::sample(rng, population, amount).into_vec();
    picked.sort_unstable();
    picked
}

/// Inject random link and node failures into a batch of equal-sized meshes.
///
/// Targets that no longer exist (link already gone, node already dead) are
/// skipped silently. The generator is supplied by the caller so a fixed
/// seed reproduces the same failures.
pub fn random_error_inject<R: Rng + ?Sized>(
    graphs: &mut [MeshGraph],
    node_error_rate: f64,
    edge_error_rate: f64,
    rng: &mut R,
) -> InjectionSummary {
    let mut summary = InjectionSummary::default();
    let Some(first) = graphs.first() else {
        return summary;
    };

    let num_nodes = first.num_nodes();
    let num_links = first.num_links();
    let total_nodes = graphs.len() * num_nodes;
    let total_links = graphs.len() * num_links;

    summary.targeted_links = target_count(total_links, edge_error_rate);
    summary.targeted_nodes = target_count(total_nodes, node_error_rate);

    for idx in sample_sorted(rng, total_links, summary.targeted_links) {
        let graph = &mut graphs[idx / num_links];
        let local_id = idx % num_links;

        let Some((source, target)) = graph.link_by_id(local_id).map(|l| (l.source, l.target))
        else {
            debug!("Link {} not present in instance {}, skipping", local_id, idx / num_links);
            continue;
        };

        let before = graph.num_links();
        graph.delete_link(source, target);
        if graph.num_links() < before {
            summary.removed_links += 1;
        }
    }

    for idx in sample_sorted(rng, total_nodes, summary.targeted_nodes) {
        let graph = &mut graphs[idx / num_nodes];
        let local_id = idx % num_nodes;

        if graph.is_node_alive(local_id) {
            graph.delete_node(local_id);
            summary.removed_nodes += 1;
        } else {
            debug!("Node {} already dead in instance {}, skipping", local_id, idx / num_nodes);
        }
    }

    info!(
        "Injected faults into {} instances: {}/{} links, {}/{} nodes removed",
        graphs.len(),
        summary.removed_links,
        summary.targeted_links,
        summary.removed_nodes,
        summary.targeted_nodes
    );

    summary
}
