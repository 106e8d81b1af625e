//! Traffic text rendering.
//!
//! The literal form is brace-initialisation data for the downstream
//! simulator: one `{...}` per node per round holding the workload
//! descriptor followed by `"send",peer,bytes` / `"recv",peer,bytes` tokens
//! in schedule order.

use super::schedule::{Step, TrafficNode, TrafficRound};
use crate::utils::matrix::{transpose, MatrixError};

/// One node's round as a literal
pub fn node_round_literal(node: &TrafficNode) -> String {
    let mut tokens = vec![format!("\"{}\"", node.workload.descriptor())];
    for step in node.steps() {
        let (kind, t) = match step {
            Step::Send(t) => ("send", t),
            Step::Recv(t) => ("recv", t),
        };
        tokens.push(format!("\"{}\"", kind));
        tokens.push(t.peer.to_string());
        tokens.push(t.bytes.to_string());
    }
    format!("{{{}}}", tokens.join(","))
}

/// Several rounds of the same node as a bracketed sequence
pub fn node_rounds_literal(rounds: &[TrafficNode]) -> String {
    let items: Vec<String> = rounds.iter().map(node_round_literal).collect();
    format!("{{{}}}", items.join(", "))
}

/// The whole schedule, node-major: one line per node, wrapped in braces.
///
/// `rounds` is round-major as produced by the generator; every round of a
/// topology covers the same alive nodes, so the matrix is rectangular.
pub fn schedule_literal(rounds: &[TrafficRound]) -> Result<String, MatrixError> {
    let by_node = transpose(rounds)?;

    let mut out = String::from("{\n");
    for node_rounds in &by_node {
        let id = node_rounds.first().map(|n| n.id).unwrap_or_default();
        out.push_str(&format!(
            "    /* node {} */ {},\n",
            id,
            node_rounds_literal(node_rounds)
        ));
    }
    out.push_str("}\n");
    Ok(out)
}

/// Human-readable report of every round
pub fn schedule_report(rounds: &[TrafficRound]) -> String {
    let mut out = String::new();
    for (r, round) in rounds.iter().enumerate() {
        out.push_str(&format!("{}\n", "=".repeat(40)));
        out.push_str(&format!("ROUND {}\n", r));
        out.push_str(&format!("{}\n", "=".repeat(40)));
        if round.is_empty() {
            out.push_str("(no traffic: fewer than two alive nodes)\n");
        }
        for node in round {
            out.push_str(&node.to_string());
            out.push('\n');
        }
    }
    out
}
