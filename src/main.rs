//! platepool - plate assay normalization and pooling pipeline
//!
//! A CLI tool that ingests per-plate hemolysis/spot measurement grids,
//! removes per-group outliers, normalizes study groups against their
//! paired control means, and pools the results across all plates.
//!
//! Exit codes:
//!   0 - Run completed and both artifacts were written
//!   1 - Runtime error (bad config, malformed plate, I/O failure)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod plate;
mod report;
mod runner;

use anyhow::Result;
use cli::Args;
use config::ExperimentConfig;
use report::observer::{DebugDumper, NullObserver, PlateObserver};
use runner::ExperimentRunner;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(&args);

    info!("platepool v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_experiment(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete experiment workflow.
fn run_experiment(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let config = load_config(&args)?;
    let runner = ExperimentRunner::new(&config)?;

    let mut observer: Box<dyn PlateObserver> = if args.debug_dumps {
        Box::new(DebugDumper::new(args.data_dir.clone()))
    } else {
        Box::new(NullObserver)
    };

    let summary = runner.run(&args.data_dir, observer.as_mut())?;
    let duration = start_time.elapsed().as_secs_f64();

    if !args.quiet {
        println!("Run summary:");
        println!("   Plates processed: {}", summary.plates_processed);
        println!("   Study groups pooled: {}", summary.study_groups);
        println!("   Control groups pooled: {}", summary.control_groups);
        println!("   Duration: {:.2}s", duration);
        println!(
            "\nArtifacts written:\n   {}\n   {}",
            summary.study_path.display(),
            summary.control_path.display()
        );
    }

    Ok(())
}

/// Load experiment configuration from the CLI path, the data folder root,
/// or defaults, in that order.
fn load_config(args: &Args) -> Result<ExperimentConfig> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return ExperimentConfig::load(config_path);
    }

    match ExperimentConfig::load_default(&args.data_dir)? {
        Some(config) => {
            info!("Loaded config.yaml from data folder");
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(ExperimentConfig::default())
        }
    }
}
