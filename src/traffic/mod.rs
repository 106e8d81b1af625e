//! Synthetic node-to-node traffic.
//!
//! Random GEMM workloads determine payload sizes; each round pairs every
//! alive node with one destination and derives a circular-wait-free
//! send/receive order per node.

pub mod workload;
pub mod schedule;
pub mod render;

pub use workload::{DataType, DataTypeError, Gemm, Workload};
pub use schedule::{generate_round, generate_rounds, Step, TrafficNode, TrafficRound, Transfer};
pub use render::{node_round_literal, node_rounds_literal, schedule_literal, schedule_report};
