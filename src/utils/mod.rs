//! Shared utilities: matrix transposition and stage timing.

pub mod matrix;
pub mod timer;

pub use matrix::{transpose, MatrixError};
pub use timer::ScopedTimer;
