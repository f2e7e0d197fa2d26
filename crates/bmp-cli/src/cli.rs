use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full optimization pipeline: PSO search, ε-constraint
    /// refinement of the resulting archive, and result aggregation.
    Run {
        /// Path to the run's TOML configuration file
        #[arg(long)]
        config: PathBuf,
        /// Directory the Pareto front's CSV and file copies are written to
        #[arg(long)]
        out: PathBuf,
    },
    /// Run only the PSO search stage, writing its archive to `out`.
    Search {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Inspect the local environment and report common setup issues
    Doctor {},
}
