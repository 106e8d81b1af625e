//! Mesh graph with lazily derived resilience metadata.
//!
//! [`MeshGraph`] owns the node arena and the link set of one topology
//! instance. The derived facts (score, connectivity, completeness) are
//! computed on first access and memoized as a unit; every mutation that
//! changes the topology drops the whole unit.

use std::cell::Cell;
use std::collections::VecDeque;

use super::types::{Link, LinkId, Node, NodeId};

/// Weight of a single alive link in the score
pub const LINK_SCORE_WEIGHT: usize = 1;

/// Weight of a single node in the score (tombstoned nodes included)
pub const NODE_SCORE_WEIGHT: usize = 3;

/// Memoized derived facts. `None` means "not computed since last mutation".
#[derive(Debug, Clone, Default)]
struct Metadata {
    score: Cell<Option<usize>>,
    has_subgraphs: Cell<Option<bool>>,
    num_components: Cell<Option<usize>>,
    is_full: Cell<Option<bool>>,
    is_all_nodes_exist: Cell<Option<bool>>,
}

impl Metadata {
    fn invalidate(&self) {
        self.score.set(None);
        self.has_subgraphs.set(None);
        self.num_components.set(None);
        self.is_full.set(None);
        self.is_all_nodes_exist.set(None);
    }
}

/// A mutable mesh topology with cached metadata.
///
/// Not safe to share between threads: reads fill the cache through `&self`.
/// Move whole instances between workers instead.
#[derive(Debug, Clone)]
pub struct MeshGraph {
    /// Side length of the mesh as built; never shrinks
    side: usize,
    nodes: Vec<Node>,
    links: Vec<Link>,
    metadata: Metadata,
}

impl MeshGraph {
    /// Assemble a graph from prebuilt parts. Used by the mesh builder.
    pub(crate) fn from_parts(side: usize, nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self {
            side,
            nodes,
            links,
            metadata: Metadata::default(),
        }
    }

    /// Original side length of the mesh
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of node slots, tombstoned ones included
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links currently present
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns true if `id` names a node slot that is not tombstoned
    pub fn is_node_alive(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_alive)
    }

    /// Ids of all alive nodes, ascending
    pub fn alive_node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_alive())
            .map(|n| n.id)
            .collect()
    }

    /// Links whose endpoints are both alive
    pub fn alive_links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links
            .iter()
            .filter(|l| self.is_node_alive(l.source) && self.is_node_alive(l.target))
    }

    /// Find a present link by its construction id (ids may be sparse)
    pub fn link_by_id(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Find a present link joining `a` and `b`
    pub fn link_between(&self, a: NodeId, b: NodeId) -> Option<&Link> {
        self.links.iter().find(|l| l.connects(a, b))
    }

    /// Number of present links incident to `id`
    pub fn degree(&self, id: NodeId) -> usize {
        self.links.iter().filter(|l| l.touches(id)).count()
    }

    // ------------------------------------------------------------------
    // Derived metadata

    /// `alive_links * 1 + total_nodes * 3`.
    ///
    /// Every node slot counts, tombstoned or not, so only missing links
    /// lower the score.
    pub fn score(&self) -> usize {
        if let Some(score) = self.metadata.score.get() {
            return score;
        }
        let alive_links = self.alive_links().count();
        let score = alive_links * LINK_SCORE_WEIGHT + self.nodes.len() * NODE_SCORE_WEIGHT;
        self.metadata.score.set(Some(score));
        score
    }

    /// Score of the intact mesh with the original side length
    pub fn full_score(&self) -> usize {
        let ideal_links = self.side * self.side.saturating_sub(1) * 2;
        ideal_links * LINK_SCORE_WEIGHT + self.nodes.len() * NODE_SCORE_WEIGHT
    }

    /// True iff the alive subgraph splits into more than one component
    pub fn has_subgraphs(&self) -> bool {
        if let Some(value) = self.metadata.has_subgraphs.get() {
            return value;
        }
        self.ensure_components();
        self.metadata.has_subgraphs.get().unwrap_or(false)
    }

    /// Connected components of the alive subgraph (0 when no node is alive)
    pub fn num_components(&self) -> usize {
        if let Some(value) = self.metadata.num_components.get() {
            return value;
        }
        self.ensure_components();
        self.metadata.num_components.get().unwrap_or(0)
    }

    /// True iff the current score equals the score of the intact mesh
    pub fn is_full(&self) -> bool {
        if let Some(value) = self.metadata.is_full.get() {
            return value;
        }
        let value = self.score() == self.full_score();
        self.metadata.is_full.set(Some(value));
        value
    }

    /// True iff no node has been tombstoned
    pub fn is_all_nodes_exist(&self) -> bool {
        if let Some(value) = self.metadata.is_all_nodes_exist.get() {
            return value;
        }
        let value = self.nodes.iter().all(Node::is_alive);
        self.metadata.is_all_nodes_exist.set(Some(value));
        value
    }

    /// Component labels for every node slot; `None` for tombstoned nodes.
    ///
    /// Labels are assigned in ascending order of the lowest node id in
    /// each component.
    pub fn component_labels(&self) -> (Vec<Option<usize>>, usize) {
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
        for link in self.alive_links() {
            adjacency[link.source].push(link.target);
            adjacency[link.target].push(link.source);
        }

        let mut labels: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut count = 0;
        let mut queue = VecDeque::new();

        for start in self.nodes.iter().filter(|n| n.is_alive()).map(|n| n.id) {
            if labels[start].is_some() {
                continue;
            }
            labels[start] = Some(count);
            queue.push_back(start);
            while let Some(node) = queue.pop_front() {
                for &neighbor in &adjacency[node] {
                    if labels[neighbor].is_none() {
                        labels[neighbor] = Some(count);
                        queue.push_back(neighbor);
                    }
                }
            }
            count += 1;
        }

        (labels, count)
    }

    fn ensure_components(&self) {
        let (_, count) = self.component_labels();
        self.metadata.num_components.set(Some(count));
        self.metadata.has_subgraphs.set(Some(count > 1));
    }

    // ------------------------------------------------------------------
    // Mutations

    /// Tombstone a node and detach every incident link.
    ///
    /// No-op for an unknown or already deleted node.
    pub fn delete_node(&mut self, id: NodeId) {
        match self.nodes.get(id) {
            Some(node) if node.is_alive() => {}
            _ => return,
        }

        self.links.retain(|l| !l.touches(id));
        self.nodes[id].is_deleted = true;
        self.metadata.invalidate();
    }

    /// Remove the link joining `a` and `b`.
    ///
    /// No-op if either endpoint is unknown or dead, or no such link exists.
    pub fn delete_link(&mut self, a: NodeId, b: NodeId) {
        if !self.is_node_alive(a) || !self.is_node_alive(b) {
            return;
        }

        let Some(id) = self.link_between(a, b).map(|l| l.id) else {
            return;
        };
        self.links.retain(|l| l.id != id);
        self.metadata.invalidate();
    }

    /// Tombstone every alive node without incident links.
    ///
    /// Returns the number of nodes tombstoned.
    pub fn delete_isolated_nodes(&mut self) -> usize {
        let mut degree = vec![0usize; self.nodes.len()];
        for link in &self.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        let mut removed = 0;
        for node in self.nodes.iter_mut() {
            if node.is_alive() && degree[node.id] == 0 {
                node.is_deleted = true;
                removed += 1;
            }
        }

        if removed > 0 {
            self.metadata.invalidate();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::mesh::generate_mesh_graph;

    #[test]
    fn test_intact_mesh_metadata() {
        for side in 1..=6 {
            let g = generate_mesh_graph(side);
            let links = 2 * side * (side - 1);
            assert_eq!(g.num_nodes(), side * side);
            assert_eq!(g.num_links(), links);
            assert_eq!(g.score(), links + 3 * side * side);
            assert!(g.is_full());
            assert_eq!(g.num_components(), 1);
            assert!(!g.has_subgraphs());
            assert!(g.is_all_nodes_exist());
        }
    }

    #[test]
    fn test_delete_node_removes_incident_links() {
        let mut g = generate_mesh_graph(3);
        // Center node of a 3x3 mesh has four neighbors
        assert_eq!(g.degree(4), 4);
        g.delete_node(4);

        assert_eq!(g.num_links(), 12 - 4);
        assert!(!g.is_node_alive(4));
        assert!(g.links().iter().all(|l| !l.touches(4)));
        assert!(!g.is_all_nodes_exist());

        let snapshot: Vec<_> = g.links().to_vec();
        g.delete_node(4);
        assert_eq!(g.links(), &snapshot[..]);
    }

    #[test]
    fn test_invalid_ids_are_ignored() {
        let mut g = generate_mesh_graph(2);
        let score = g.score();
        g.delete_node(99);
        g.delete_link(0, 99);
        g.delete_link(0, 3); // diagonal, never linked
        assert_eq!(g.score(), score);
        assert_eq!(g.num_links(), 4);
    }

    #[test]
    fn test_delete_link_requires_alive_endpoints() {
        let mut g = generate_mesh_graph(2);
        g.delete_node(1);
        let before = g.num_links();
        g.delete_link(0, 1);
        assert_eq!(g.num_links(), before);

        g.delete_link(2, 0);
        assert_eq!(g.num_links(), before - 1);
        assert!(g.link_between(0, 2).is_none());

        // Absent link: nothing changes
        let score = g.score();
        g.delete_link(0, 2);
        assert_eq!(g.num_links(), before - 1);
        assert_eq!(g.score(), score);
    }

    #[test]
    fn test_metadata_never_stale() {
        let mut g = generate_mesh_graph(3);
        assert!(g.is_full());
        assert_eq!(g.score(), 12 + 27);

        g.delete_link(0, 1);
        assert_eq!(g.score(), 11 + 27);
        assert!(!g.is_full());
        assert_eq!(g.num_components(), 1);

        g.delete_link(0, 3);
        assert_eq!(g.num_components(), 2);
        assert!(g.has_subgraphs());

        // Repeated reads between mutations agree
        assert_eq!(g.score(), g.score());
        assert_eq!(g.num_components(), g.num_components());
    }

    #[test]
    fn test_score_counts_tombstoned_nodes() {
        let mut g = generate_mesh_graph(2);
        g.delete_node(0);
        // Two links gone, node slot still weighted
        assert_eq!(g.score(), 2 + 4 * 3);
        assert_eq!(g.full_score(), 4 + 4 * 3);
    }

    #[test]
    fn test_delete_isolated_nodes_idempotent() {
        let mut g = generate_mesh_graph(3);
        g.delete_link(0, 1);
        g.delete_link(0, 3);
        assert_eq!(g.num_components(), 2);

        assert_eq!(g.delete_isolated_nodes(), 1);
        assert!(!g.is_node_alive(0));
        assert_eq!(g.num_components(), 1);
        assert!(!g.has_subgraphs());

        let score = g.score();
        assert_eq!(g.delete_isolated_nodes(), 0);
        assert_eq!(g.score(), score);
    }

    #[test]
    fn test_no_alive_nodes() {
        let mut g = generate_mesh_graph(2);
        for id in 0..4 {
            g.delete_node(id);
        }
        assert_eq!(g.num_components(), 0);
        assert!(!g.has_subgraphs());
        assert_eq!(g.num_links(), 0);
        assert!(g.alive_node_ids().is_empty());
    }

    #[test]
    fn test_component_labels() {
        let mut g = generate_mesh_graph(2);
        g.delete_link(0, 1);
        g.delete_link(2, 3);
        let (labels, count) = g.component_labels();
        assert_eq!(count, 2);
        assert_eq!(labels, vec![Some(0), Some(1), Some(0), Some(1)]);
    }
}
