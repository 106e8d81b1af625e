use serde::{Deserialize, Serialize};

use crate::traffic::DataType;

/// Top-level configuration mirroring the YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub faults: FaultConfig,
    #[serde(default)]
    pub traffic: TrafficConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepConfig>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if level.trim().is_empty() {
                return Err(ValidationError::InvalidGeneral(
                    "log_level cannot be empty".to_string(),
                ));
            }
        }

        if self.mesh.size == 0 {
            return Err(ValidationError::InvalidMesh(
                "size must be greater than 0".to_string(),
            ));
        }
        if self.mesh.batch_size == 0 {
            return Err(ValidationError::InvalidMesh(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        Self::validate_rate("node_error_rate", self.faults.node_error_rate)
            .map_err(ValidationError::InvalidFaults)?;
        Self::validate_rate("edge_error_rate", self.faults.edge_error_rate)
            .map_err(ValidationError::InvalidFaults)?;

        if self.traffic.layers == 0 {
            return Err(ValidationError::InvalidTraffic(
                "layers must be greater than 0".to_string(),
            ));
        }
        if self.traffic.rounds == 0 {
            return Err(ValidationError::InvalidTraffic(
                "rounds must be greater than 0".to_string(),
            ));
        }

        if self.export.graph_name_prefix.trim().is_empty() {
            return Err(ValidationError::InvalidExport(
                "graph_name_prefix cannot be empty".to_string(),
            ));
        }

        if let Some(sweep) = &self.sweep {
            sweep.validate()?;
        }

        Ok(())
    }

    fn validate_rate(name: &str, rate: f64) -> Result<(), String> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(format!("{} must be within [0, 1], got {}", name, rate));
        }
        Ok(())
    }
}

/// Shared general configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seed of every generator used in a run
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_seed() -> u64 {
    42
}

/// Mesh batch used by the single-batch pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Side length N of the N x N mesh
    pub size: usize,
    /// Number of independent instances
    pub batch_size: usize,
}

/// Failure rates applied to the whole batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultConfig {
    pub node_error_rate: f64,
    pub edge_error_rate: f64,
    /// Tombstone nodes left without links after injection
    pub delete_isolated: bool,
}

/// Traffic generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// GEMM layers per node per round
    pub layers: usize,
    pub data_type: DataType,
    pub rounds: usize,
    /// Index into the selected instances of the instance to drive traffic on
    pub graph_index: usize,
}

/// Topology export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub graph_name_prefix: String,
    pub edge_weight: u32,
    pub pipeline_stage_delay: u32,
    /// Upper bound on exported topology files (0 disables export)
    pub max_topologies: usize,
}

/// Evenly spaced rate values `start + i * step` for `i in 0..count`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl RateRange {
    pub fn values(&self) -> Vec<f64> {
        (0..self.count)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    fn validate(&self, name: &str) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidSweep(format!(
                "{} must contain at least one value",
                name
            )));
        }
        if self.step < 0.0 {
            return Err(ValidationError::InvalidSweep(format!(
                "{} step cannot be negative",
                name
            )));
        }
        let last = self.start + (self.count - 1) as f64 * self.step;
        if self.start < 0.0 || last > 1.0 {
            return Err(ValidationError::InvalidSweep(format!(
                "{} values must stay within [0, 1], got {}..={}",
                name, self.start, last
            )));
        }
        Ok(())
    }
}

/// Mesh size x failure rate sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub mesh_sizes: Vec<usize>,
    pub batch_size: usize,
    pub node_error_rates: RateRange,
    pub edge_error_rates: RateRange,
    pub delete_isolated: bool,
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mesh_sizes.is_empty() {
            return Err(ValidationError::InvalidSweep(
                "mesh_sizes cannot be empty".to_string(),
            ));
        }
        if self.mesh_sizes.contains(&0) {
            return Err(ValidationError::InvalidSweep(
                "mesh_sizes must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidSweep(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        self.node_error_rates.validate("node_error_rates")?;
        self.edge_error_rates.validate("edge_error_rates")?;
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid mesh configuration: {0}")]
    InvalidMesh(String),
    #[error("Invalid fault configuration: {0}")]
    InvalidFaults(String),
    #[error("Invalid traffic configuration: {0}")]
    InvalidTraffic(String),
    #[error("Invalid export configuration: {0}")]
    InvalidExport(String),
    #[error("Invalid sweep configuration: {0}")]
    InvalidSweep(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            log_level: None,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            size: 4,
            batch_size: 5000,
        }
    }
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            node_error_rate: 0.0,
            edge_error_rate: 0.05,
            delete_isolated: true,
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            layers: 6,
            data_type: DataType::Bf16,
            rounds: 3,
            graph_index: 0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            graph_name_prefix: "graph".to_string(),
            edge_weight: 1,
            pipeline_stage_delay: 1,
            max_topologies: 16,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            mesh_sizes: (2..=8).collect(),
            batch_size: 10000,
            node_error_rates: RateRange {
                start: 0.005,
                step: 0.005,
                count: 20,
            },
            edge_error_rates: RateRange {
                start: 0.01,
                step: 0.005,
                count: 19,
            },
            delete_isolated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
general:
  seed: 7
  log_level: debug
mesh:
  size: 5
  batch_size: 100
faults:
  node_error_rate: 0.01
  edge_error_rate: 0.02
  delete_isolated: true
traffic:
  layers: 4
  data_type: FP16
  rounds: 2
  graph_index: 3
export:
  graph_name_prefix: mesh
  edge_weight: 2
  pipeline_stage_delay: 3
  max_topologies: 4
sweep:
  mesh_sizes: [2, 3]
  batch_size: 50
  node_error_rates: { start: 0.0, step: 0.1, count: 3 }
  edge_error_rates: { start: 0.05, step: 0.05, count: 2 }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.seed, 7);
        assert_eq!(config.mesh.size, 5);
        assert_eq!(config.traffic.data_type, DataType::Fp16);
        assert_eq!(config.traffic.graph_index, 3);
        assert_eq!(config.export.graph_name_prefix, "mesh");

        let sweep = config.sweep.unwrap();
        assert_eq!(sweep.mesh_sizes, vec![2, 3]);
        assert!(!sweep.delete_isolated);
        assert_eq!(sweep.node_error_rates.values().len(), 3);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml = r#"
general:
  seed: 1
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.mesh.size, 4);
        assert_eq!(config.traffic.rounds, 3);
        assert!(config.sweep.is_none());
        assert_eq!(config.general.log_level, None);
    }

    #[test]
    fn test_partial_sections_fill_missing_fields() {
        let yaml = r#"
mesh:
  size: 6
faults:
  node_error_rate: 0.02
traffic:
  rounds: 5
export:
  max_topologies: 2
sweep:
  mesh_sizes: [3]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.seed, 42);

        assert_eq!(config.mesh.size, 6);
        assert_eq!(config.mesh.batch_size, 5000);

        assert_eq!(config.faults.node_error_rate, 0.02);
        assert_eq!(config.faults.edge_error_rate, 0.05);
        assert!(config.faults.delete_isolated);

        assert_eq!(config.traffic.rounds, 5);
        assert_eq!(config.traffic.layers, 6);
        assert_eq!(config.traffic.data_type, DataType::Bf16);

        assert_eq!(config.export.max_topologies, 2);
        assert_eq!(config.export.graph_name_prefix, "graph");
        assert_eq!(config.export.edge_weight, 1);

        let sweep = config.sweep.unwrap();
        assert_eq!(sweep.mesh_sizes, vec![3]);
        assert_eq!(sweep.batch_size, 10000);
        assert_eq!(sweep.edge_error_rates.count, 19);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.faults.edge_error_rate = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("edge_error_rate"));

        let mut config = Config::default();
        config.mesh.size = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidMesh(_))));

        let mut config = Config::default();
        config.traffic.layers = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTraffic(_))));

        let mut config = Config::default();
        config.export.graph_name_prefix = " ".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidExport(_))));
    }

    #[test]
    fn test_sweep_range_validation() {
        let mut sweep = SweepConfig::default();
        assert!(sweep.validate().is_ok());

        sweep.edge_error_rates = RateRange {
            start: 0.5,
            step: 0.2,
            count: 4,
        };
        assert!(sweep.validate().is_err());

        let mut sweep = SweepConfig::default();
        sweep.node_error_rates.count = 0;
        assert!(sweep.validate().is_err());

        let mut sweep = SweepConfig::default();
        sweep.mesh_sizes.clear();
        assert!(sweep.validate().is_err());
    }

    #[test]
    fn test_rate_range_values() {
        let range = RateRange {
            start: 0.01,
            step: 0.005,
            count: 3,
        };
        let values = range.values();
        assert!((values[0] - 0.01).abs() < 1e-12);
        assert!((values[2] - 0.02).abs() < 1e-12);
    }
}
