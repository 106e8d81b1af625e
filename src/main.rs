use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;

use meshfault::analysis::print_summary;
use meshfault::config_loader::{self, CliOverrides};
use meshfault::orchestrator;
use meshfault::topology::{ascii_art, graph_document, DocumentAttributes, MeshGraph};
use meshfault::traffic::DataType;

/// Fault injection and traffic synthesis for 2D mesh networks
#[derive(Parser, Debug)]
#[command(name = "meshfault", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for generated files
    #[arg(short, long, default_value = "meshfault_output")]
    output: PathBuf,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Fault one batch, select candidates, export topologies and traffic
    Run {
        /// Override the configured traffic data type (FP32, FP16, BF16, INT8, ...)
        #[arg(long)]
        data_type: Option<DataType>,
    },

    /// Sweep node and edge failure rates and write one CSV per mesh size
    Sweep,

    /// Print a single faulted instance and its metadata
    Show {
        /// Also print the instance as a graph document
        #[arg(long)]
        document: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = config_loader::load_config(&cli.config)?;
    config_loader::apply_overrides(
        &mut config,
        &CliOverrides {
            seed: cli.seed,
            log_level: cli.log_level.clone(),
        },
    )?;

    let level = config
        .general
        .log_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    info!("Configuration file: {:?}", cli.config);
    info!("Output directory: {:?}", cli.output);
    info!("Seed: {}", config.general.seed);

    match cli.command {
        Commands::Run { data_type } => {
            if let Some(data_type) = data_type {
                info!("Overriding data type: {} -> {}", config.traffic.data_type, data_type);
                config.traffic.data_type = data_type;
            }
            let output = orchestrator::run_pipeline(&config, &cli.output)?;
            print_summary(&output.summary);
            info!("Wrote {} files to {:?}", output.files.len(), cli.output);
        }
        Commands::Sweep => {
            let files = orchestrator::run_sweep_to_dir(&config, &cli.output)?;
            for file in &files {
                println!("{}", file.display());
            }
        }
        Commands::Show { document } => {
            let graph = orchestrator::sample_instance(&config);
            print!("{}", describe(&graph));
            if document {
                let attrs = DocumentAttributes {
                    edge_weight: config.export.edge_weight,
                    pipeline_stage_delay: config.export.pipeline_stage_delay,
                };
                print!("{}", graph_document(&config.export.graph_name_prefix, attrs, &graph));
            }
        }
    }

    Ok(())
}

fn describe(graph: &MeshGraph) -> String {
    format!(
        "{}\nscore: {}/{}\ncomponents: {}\nsubgraphs: {}\nfull: {}\nall nodes exist: {}\n",
        ascii_art(graph),
        graph.score(),
        graph.full_score(),
        graph.num_components(),
        graph.has_subgraphs(),
        graph.is_full(),
        graph.is_all_nodes_exist()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshfault::topology::generate_mesh_graph;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["meshfault", "--config", "mesh.yaml", "run"]);

        assert_eq!(cli.config, PathBuf::from("mesh.yaml"));
        assert_eq!(cli.output, PathBuf::from("meshfault_output"));
        assert_eq!(cli.command, Commands::Run { data_type: None });
        assert_eq!(cli.seed, None);
        assert_eq!(cli.threads, 0);
    }

    #[test]
    fn test_overrides_and_subcommand() {
        let cli = Cli::parse_from([
            "meshfault",
            "--config",
            "mesh.yaml",
            "--seed",
            "7",
            "-j",
            "4",
            "--log-level",
            "debug",
            "show",
            "--document",
        ]);

        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.threads, 4);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.command, Commands::Show { document: true });
    }

    #[test]
    fn test_run_data_type_override() {
        let cli = Cli::parse_from(["meshfault", "-c", "mesh.yaml", "run", "--data-type", "INT8"]);
        assert_eq!(
            cli.command,
            Commands::Run {
                data_type: Some(DataType::Int8)
            }
        );
    }

    #[test]
    fn test_data_type_is_case_insensitive() {
        let cli = Cli::parse_from(["meshfault", "-c", "mesh.yaml", "run", "--data-type", "bf16"]);
        assert_eq!(
            cli.command,
            Commands::Run {
                data_type: Some(DataType::Bf16)
            }
        );

        let err = Cli::try_parse_from(["meshfault", "-c", "mesh.yaml", "run", "--data-type", "fp8"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown data type: fp8"));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["meshfault", "--config", "mesh.yaml"]).is_err());
    }

    #[test]
    fn test_describe_intact_mesh() {
        let text = describe(&generate_mesh_graph(2));
        assert!(text.contains("score: 16/16"));
        assert!(text.contains("components: 1"));
        assert!(text.contains("full: true"));
    }
}
