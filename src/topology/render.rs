//! Text rendering of mesh topologies.
//!
//! Produces the undirected graph-description document consumed by the
//! downstream routing tools, and a small ASCII picture for terminals.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::info;

use super::graph::MeshGraph;

/// Attributes shared by every node and edge of an exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentAttributes {
    pub edge_weight: u32,
    pub pipeline_stage_delay: u32,
}

impl Default for DocumentAttributes {
    fn default() -> Self {
        Self {
            edge_weight: 1,
            pipeline_stage_delay: 1,
        }
    }
}

/// One line per tombstoned node and one `a--b` line per alive link.
///
/// Nodes are visited in ascending id order; each alive link is written
/// once, from its lower endpoint.
pub fn topology_lines(graph: &MeshGraph) -> String {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); graph.num_nodes()];
    for link in graph.alive_links() {
        let (lo, hi) = if link.source < link.target {
            (link.source, link.target)
        } else {
            (link.target, link.source)
        };
        neighbors[lo].push(hi);
    }

    let mut out = String::new();
    for node in graph.nodes() {
        if node.is_deleted {
            out.push_str(&format!("\t{}\n", node.id));
            continue;
        }
        let higher = &mut neighbors[node.id];
        higher.sort_unstable();
        higher.dedup();
        for j in higher.iter() {
            out.push_str(&format!("\t{}--{}\n", node.id, j));
        }
    }
    out
}

/// Full graph document with uniform edge weight and node delay attributes
pub fn graph_document(name: &str, attrs: DocumentAttributes, graph: &MeshGraph) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("graph {} {{\n", name));
    doc.push_str(&format!("\tedge[weight={}]\n", attrs.edge_weight));
    doc.push_str(&format!(
        "\tnode[pipeline_stage_delay={}]\n",
        attrs.pipeline_stage_delay
    ));
    doc.push_str(&topology_lines(graph));
    doc.push_str("}\n");
    doc
}

/// Write a graph document, creating parent directories and replacing any
/// existing file
pub fn write_topology_file(
    path: &Path,
    name: &str,
    attrs: DocumentAttributes,
    graph: &MeshGraph,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            info!("Created directory {}", parent.display());
        }
    }

    fs::write(path, graph_document(name, attrs, graph))
        .with_context(|| format!("Failed to write topology to {}", path.display()))?;
    Ok(())
}

/// ASCII picture of the mesh: `O` alive node, `-` / `|` alive link
pub fn ascii_art(graph: &MeshGraph) -> String {
    let side = graph.side();
    if side == 0 {
        return "Empty graph\n".to_string();
    }

    let dim = side * 2 - 1;
    let mut grid = vec![vec![' '; dim]; dim];

    for node in graph.nodes().iter().filter(|n| n.is_alive()) {
        grid[(node.id / side) * 2][(node.id % side) * 2] = 'O';
    }

    for link in graph.alive_links() {
        let (sr, sc) = (link.source / side, link.source % side);
        let (tr, tc) = (link.target / side, link.target % side);
        if sr == tr && sc.abs_diff(tc) == 1 {
            grid[sr * 2][sc.min(tc) * 2 + 1] = '-';
        } else if sc == tc && sr.abs_diff(tr) == 1 {
            grid[sr.min(tr) * 2 + 1][sc * 2] = '|';
        }
    }

    let mut out = String::with_capacity(dim * (dim + 1));
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}
