//! Per-round point-to-point traffic and its send/receive ordering.
//!
//! Every alive node sends exactly one transfer per round to a uniformly
//! chosen other alive node and receives whatever is addressed to it. The
//! order in which a node performs its send and receives is fixed by node
//! id so that no two nodes of a round can wait on each other: between any
//! pair, the higher id sends before receiving from the lower id, and the
//! lower id receives from the higher id before sending.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::workload::{DataType, Workload};
use crate::topology::{MeshGraph, NodeId};

/// One directed transfer as seen from a node: the peer and the payload size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub peer: NodeId,
    pub bytes: u64,
}

/// A single step of a node's schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Send(Transfer),
    Recv(Transfer),
}

/// Traffic of one node in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficNode {
    pub id: NodeId,
    pub workload: Workload,
    /// The single outgoing transfer (`peer` is the destination)
    pub send: Transfer,
    /// Incoming transfers (`peer` is the source), descending by source id
    pub recv: Vec<Transfer>,
    /// Whether the outgoing transfer precedes every receive
    pub send_first: bool,
}

impl TrafficNode {
    /// Ordered schedule of this node's sends and receives.
    ///
    /// With `send_first` the send leads and receives follow in descending
    /// source order. Otherwise receives from higher ids come first, then the
    /// send, then receives from lower ids.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.recv.len() + 1);
        if self.send_first {
            steps.push(Step::Send(self.send));
            steps.extend(self.recv.iter().copied().map(Step::Recv));
        } else {
            let (higher, lower): (Vec<Transfer>, Vec<Transfer>) =
                self.recv.iter().copied().partition(|t| t.peer >= self.id);
            steps.extend(higher.into_iter().map(Step::Recv));
            steps.push(Step::Send(self.send));
            steps.extend(lower.into_iter().map(Step::Recv));
        }
        steps
    }
}

impl fmt::Display for TrafficNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{:03}] LAYERS:", self.id)?;
        for gemm in &self.workload.layers {
            writeln!(f, "{}", gemm.name())?;
        }
        writeln!(f)?;
        writeln!(f, "FirstSend: {}", if self.send_first { "YES" } else { "NO" })?;
        writeln!(f, "SEND_TO/DataSize: ({}, {})", self.send.peer, self.send.bytes)?;
        if self.recv.is_empty() {
            writeln!(f, "RECV_FROM: N/A")?;
        } else {
            for t in &self.recv {
                writeln!(f, "RECV_FROM/DataSize: ({}, {})", t.peer, t.bytes)?;
            }
        }
        Ok(())
    }
}

/// All node records of one round, ascending by node id
pub type TrafficRound = Vec<TrafficNode>;

/// Generate one round of traffic over the alive nodes of `graph`.
///
/// Returns an empty round when fewer than two nodes are alive.
pub fn generate_round<R: Rng + ?Sized>(
    rng: &mut R,
    graph: &MeshGraph,
    layers: usize,
    data_type: DataType,
) -> TrafficRound {
    let alive = graph.alive_node_ids();
    if alive.len() < 2 {
        return Vec::new();
    }

    let mut round: TrafficRound = Vec::with_capacity(alive.len());
    for (pos, &id) in alive.iter().enumerate() {
        let workload = Workload::random(rng, layers, data_type);

        // Uniform over the other alive nodes
        let mut pick = rng.gen_range(0..alive.len() - 1);
        if pick >= pos {
            pick += 1;
        }

        let send = Transfer {
            peer: alive[pick],
            bytes: workload.total_bytes(),
        };
        round.push(TrafficNode {
            id,
            workload,
            send,
            recv: Vec::new(),
            send_first: true,
        });
    }

    let mut incoming: Vec<Vec<Transfer>> = vec![Vec::new(); alive.len()];
    for node in &round {
        // Destinations are drawn from `alive`, which is sorted
        if let Ok(dest) = alive.binary_search(&node.send.peer) {
            incoming[dest].push(Transfer {
                peer: node.id,
                bytes: node.send.bytes,
            });
        }
    }

    for (node, mut recv) in round.iter_mut().zip(incoming) {
        recv.sort_by(|a, b| b.peer.cmp(&a.peer));
        node.send_first = recv.first().map_or(true, |t| t.peer < node.id);
        node.recv = recv;
    }

    round
}

/// Generate `rounds` independent rounds
pub fn generate_rounds<R: Rng + ?Sized>(
    rng: &mut R,
    graph: &MeshGraph,
    layers: usize,
    data_type: DataType,
    rounds: usize,
) -> Vec<TrafficRound> {
    (0..rounds)
        .map(|_| generate_round(rng, graph, layers, data_type))
        .collect()
}
