//! Filtering and ranking of a faulted batch by its metadata.

use log::info;

use crate::topology::MeshGraph;

/// Tombstone isolated nodes in every instance; returns the total removed
pub fn delete_isolated_nodes_batch(graphs: &mut [MeshGraph]) -> usize {
    graphs.iter_mut().map(MeshGraph::delete_isolated_nodes).sum()
}

/// Sort instances ascending by score (stable, so equal scores keep batch order)
pub fn sort_by_score(graphs: &mut [MeshGraph]) {
    graphs.sort_by_key(MeshGraph::score);
}

/// Instances usable for traffic: every node present and a single component
pub fn is_candidate(graph: &MeshGraph) -> bool {
    graph.is_all_nodes_exist() && !graph.has_subgraphs()
}

/// Rank the batch by score and keep the candidate instances
pub fn select_candidates(mut graphs: Vec<MeshGraph>) -> Vec<MeshGraph> {
    let total = graphs.len();
    sort_by_score(&mut graphs);
    graphs.retain(is_candidate);
    info!("Selected {} of {} instances", graphs.len(), total);
    graphs
}
