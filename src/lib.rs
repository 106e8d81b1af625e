//! # Meshfault - Fault injection and traffic synthesis for 2D mesh networks
//!
//! This library builds batches of regular 2D mesh interconnects, injects
//! random node and link failures, ranks the damaged instances by how much of
//! the mesh survived, and generates deadlock-free synthetic traffic for the
//! instances that remain fully usable.
//!
//! ## Overview
//!
//! A mesh of side `k` has `k*k` nodes and `2*k*(k-1)` links. Every instance in
//! a batch starts intact; faults are sampled without replacement over the
//! whole batch, so the batch as a whole loses exactly `round(rate * total)`
//! links and nodes while the split between instances is random. Each
//! instance caches its resilience metadata (score, connectivity, completeness)
//! until the next mutation.
//!
//! ## Key Features
//!
//! - **Batch Fault Injection**: Exact total link and node failure counts per batch
//! - **Cached Metadata**: Score, subgraph detection and completeness flags
//! - **Selection**: Rank by score, keep fully-populated connected instances
//! - **Traffic Rounds**: Random GEMM payloads with a circular-wait-free step order
//! - **Failure Sweeps**: Parallel grids of (node rate, edge rate) exported as CSV
//! - **Reproducible**: Every run is driven by an explicit seed
//!
//! ## Architecture
//!
//! - `config`: Type-safe configuration structures and validation
//! - `config_loader`: YAML loading and command-line overrides
//! - `topology`: Mesh construction, the mutable graph and text rendering
//! - `fault`: Random fault injection across a batch
//! - `traffic`: Workloads, traffic rounds and schedule rendering
//! - `analysis`: Selection, sweeps and reports
//! - `orchestrator`: End-to-end pipelines used by the command-line tool
//! - `utils`: Matrix transposition and stage timing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use meshfault::{config_loader, orchestrator};
//!
//! let config = config_loader::load_config(Path::new("meshfault.yaml"))?;
//! let output = orchestrator::run_pipeline(&config, Path::new("meshfault_output"))?;
//!
//! // meshfault_output now contains:
//! // - selection.json: batch statistics and selected scores
//! // - topologies/graph_{i}.gv: selected instances as graph documents
//! // - traffic.txt / traffic_report.txt: traffic of one selected instance
//! println!("{} instances selected", output.summary.selected);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   seed: 42
//!
//! mesh:
//!   size: 4
//!   batch_size: 5000
//!
//! faults:
//!   node_error_rate: 0.0
//!   edge_error_rate: 0.05
//!   delete_isolated: true
//!
//! traffic:
//!   layers: 6
//!   data_type: BF16
//!   rounds: 3
//! ```
//!
//! ## Error Handling
//!
//! Fallible I/O and configuration paths return
//! `Result<T, color_eyre::eyre::Error>` with context attached; domain errors
//! are `thiserror` enums. Graph mutations never fail: invalid or stale ids
//! are silent no-ops.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod fault;
pub mod traffic;
pub mod analysis;
pub mod orchestrator;
pub mod utils;
