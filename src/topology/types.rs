//! Topology type definitions.
//!
//! Nodes live in an index-stable arena: a node's id is its position and is
//! never reused. Deletion only flips the tombstone flag.

/// Stable node identifier (position in the node arena)
pub type NodeId = usize;

/// Stable link identifier, assigned at construction
pub type LinkId = usize;

/// A mesh node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Tombstone flag; the slot is kept so ids stay positional
    pub is_deleted: bool,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_deleted: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_deleted
    }
}

/// An undirected link between two orthogonally adjacent nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub name: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Link {
    pub fn new(id: LinkId, name: impl Into<String>, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            name: name.into(),
            source,
            target,
        }
    }

    /// Returns true if `node` is one of the endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// Returns true if the link joins `a` and `b` in either direction
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
