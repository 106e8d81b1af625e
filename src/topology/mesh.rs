//! Regular 2D mesh construction.
//!
//! Link ids are contiguous at construction: horizontal links first
//! (`0..side*(side-1)`), then vertical links continuing the sequence.

use rayon::prelude::*;

use super::graph::MeshGraph;
use super::types::{Link, Node};

/// Build an intact `side x side` mesh
pub fn generate_mesh_graph(side: usize) -> MeshGraph {
    let nodes: Vec<Node> = (0..side * side)
        .map(|idx| Node::new(idx, format!("node_({},{})", idx / side, idx % side)))
        .collect();

    let span = side.saturating_sub(1);
    let horizontal = side * span;
    let mut links = Vec::with_capacity(horizontal * 2);

    for idx in 0..horizontal {
        let row = idx / span;
        let col = idx % span;
        let left = row * side + col;
        links.push(Link::new(
            idx,
            format!("connect_horizontal_({},{})", row, col),
            left,
            left + 1,
        ));
    }

    for idx in 0..span * side {
        let row = idx / side;
        let col = idx % side;
        let top = row * side + col;
        links.push(Link::new(
            idx + horizontal,
            format!("connect_vertical_({},{})", row, col),
            top,
            top + side,
        ));
    }

    MeshGraph::from_parts(side, nodes, links)
}

/// Build `batch_size` independent intact meshes of the same side length
pub fn generate_mesh_batch(side: usize, batch_size: usize) -> Vec<MeshGraph> {
    (0..batch_size)
        .into_par_iter()
        .map(|_| generate_mesh_graph(side))
        .collect()
}
