//! Randomized GEMM workload descriptors.
//!
//! Every node of a traffic round runs a short chain of matrix multiplies
//! whose output size determines how many bytes it ships to its peer.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Candidate M dimensions
pub const M_VALUES: [u64; 7] = [16, 32, 64, 128, 256, 512, 1024];
/// Candidate N dimensions
pub const N_VALUES: [u64; 7] = [16, 32, 64, 128, 256, 512, 1024];
/// Candidate K dimensions
pub const K_VALUES: [u64; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Numeric element type of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Fp32,
    Float,
    Fp16,
    Bf16,
    Int8,
    Uint8,
    Int32,
    Fp64,
}

impl DataType {
    /// Size of one element in bytes
    pub fn byte_width(self) -> u64 {
        match self {
            DataType::Fp32 | DataType::Float | DataType::Int32 => 4,
            DataType::Fp16 | DataType::Bf16 => 2,
            DataType::Int8 | DataType::Uint8 => 1,
            DataType::Fp64 => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Fp32 => "FP32",
            DataType::Float => "FLOAT",
            DataType::Fp16 => "FP16",
            DataType::Bf16 => "BF16",
            DataType::Int8 => "INT8",
            DataType::Uint8 => "UINT8",
            DataType::Int32 => "INT32",
            DataType::Fp64 => "FP64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while parsing a data type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTypeError {
    #[error("Unknown data type: {0}")]
    Unknown(String),
}

impl FromStr for DataType {
    type Err = DataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FP32" => Ok(DataType::Fp32),
            "FLOAT" => Ok(DataType::Float),
            "FP16" => Ok(DataType::Fp16),
            "BF16" => Ok(DataType::Bf16),
            "INT8" => Ok(DataType::Int8),
            "UINT8" => Ok(DataType::Uint8),
            "INT32" => Ok(DataType::Int32),
            "FP64" => Ok(DataType::Fp64),
            _ => Err(DataTypeError::Unknown(s.to_string())),
        }
    }
}

fn pick<R: Rng + ?Sized>(values: &[u64], rng: &mut R) -> u64 {
    values[rng.gen_range(0..values.len())]
}

/// A single `C[m x n] = A[m x k] * B[k x n]` operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gemm {
    pub m: u64,
    pub n: u64,
    pub k: u64,
}

impl Gemm {
    /// Draw each dimension uniformly from its candidate set
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let m = pick(&M_VALUES, rng);
        let n = pick(&N_VALUES, rng);
        let k = pick(&K_VALUES, rng);
        Self { m, n, k }
    }

    pub fn name(&self) -> String {
        format!("gemm_{}_{}_{}", self.m, self.n, self.k)
    }

    /// Bytes of the output matrix
    pub fn output_bytes(&self, data_type: DataType) -> u64 {
        self.m * self.n * data_type.byte_width()
    }
}

/// A chain of GEMM layers computed by one node in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub data_type: DataType,
    pub layers: Vec<Gemm>,
}

impl Workload {
    /// Generate `layers` random GEMM operations
    pub fn random<R: Rng + ?Sized>(rng: &mut R, layers: usize, data_type: DataType) -> Self {
        Self {
            data_type,
            layers: (0..layers).map(|_| Gemm::random(rng)).collect(),
        }
    }

    /// Total output bytes over all layers
    pub fn total_bytes(&self) -> u64 {
        self.layers
            .iter()
            .map(|g| g.output_bytes(self.data_type))
            .sum()
    }

    /// Layer names joined with `;`
    pub fn descriptor(&self) -> String {
        self.layers
            .iter()
            .map(Gemm::name)
            .collect::<Vec<_>>()
            .join(";")
    }
}
