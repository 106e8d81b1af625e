//! Mesh topology module.
//!
//! Construction of regular 2D meshes, the mutable graph with cached
//! resilience metadata, and text rendering of topologies.

pub mod types;
pub mod mesh;
pub mod graph;
pub mod render;

// Re-export key types and functions for easier access
pub use types::{Link, LinkId, Node, NodeId};
pub use mesh::{generate_mesh_batch, generate_mesh_graph};
pub use graph::MeshGraph;
pub use render::{ascii_art, graph_document, topology_lines, write_topology_file, DocumentAttributes};
