//! Random fault injection across batches of mesh instances.

pub mod inject;

pub use inject::{random_error_inject, InjectionSummary};
