//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and verbosity handling.

use clap::Parser;
use std::path::PathBuf;

/// platepool - plate assay normalization and pooling pipeline
///
/// Processes every plate folder under a data directory (hem.csv, spot.csv,
/// layout.csv, plate.yaml), removes per-group outliers, normalizes study
/// groups against their control means, and pools the results into
/// study_groups.json and control_groups.json at the data folder root.
///
/// Examples:
///   platepool ./data
///   platepool ./data --config ./config.yaml
///   platepool ./data --debug-dumps --verbose
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data folder containing one subdirectory per plate
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Path to the experiment configuration file
    ///
    /// If not specified, looks for config.yaml at the data folder root;
    /// when that is absent too, the default IQR parameters (25/75/1.5)
    /// apply.
    #[arg(short, long, value_name = "FILE", env = "PLATEPOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write per-plate debug dumps into <plate>/debug/
    #[arg(long)]
    pub debug_dumps: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if !self.data_dir.exists() {
            return Err(format!(
                "Data folder does not exist: {}",
                self.data_dir.display()
            ));
        }
        if !self.data_dir.is_dir() {
            return Err(format!(
                "Data path is not a directory: {}",
                self.data_dir.display()
            ));
        }

        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
