//! Experiment orchestration.
//!
//! Drives the full run: `ExperimentRunner::new` binds the outlier filter
//! from configuration (Configured), `run` processes every plate folder in
//! sorted order (Processing) and writes the two pooled artifacts once at
//! the end (Done). Any failure aborts the run before anything is written.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::{
    extract_groups, normalize_plate, partition_roles, Aggregator, IqrFilter,
};
use crate::config::ExperimentConfig;
use crate::models::{ratio_grid, GroupMap};
use crate::plate::{discover_plates, loader, plate_name};
use crate::report;
use crate::report::observer::PlateObserver;

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of plate folders processed.
    pub plates_processed: usize,
    /// Number of distinct pooled study groups.
    pub study_groups: usize,
    /// Number of distinct pooled control groups.
    pub control_groups: usize,
    /// Path of the written study artifact.
    pub study_path: PathBuf,
    /// Path of the written control artifact.
    pub control_path: PathBuf,
}

/// Owns the bound filter and the process-wide pools for one run.
pub struct ExperimentRunner {
    filter: IqrFilter,
    pools: Aggregator,
}

impl ExperimentRunner {
    /// Binds the outlier filter declared by the experiment configuration.
    pub fn new(config: &ExperimentConfig) -> Result<Self> {
        Ok(Self {
            filter: config.outlier_filter()?,
            pools: Aggregator::default(),
        })
    }

    /// Processes every plate folder under `data_dir` and writes the pooled
    /// artifacts at its root.
    ///
    /// An empty folder set is a valid run: two empty-mapping artifacts are
    /// written.
    pub fn run(mut self, data_dir: &Path, observer: &mut dyn PlateObserver) -> Result<RunSummary> {
        let folders = discover_plates(data_dir)?;
        info!(plates = folders.len(), "starting run");

        for folder in &folders {
            self.process_plate(folder, observer)
                .with_context(|| format!("while processing plate '{}'", plate_name(folder)))?;
        }

        let (study_path, control_path) = report::write_pools(data_dir, &self.pools)?;

        Ok(RunSummary {
            plates_processed: folders.len(),
            study_groups: self.pools.study().len(),
            control_groups: self.pools.control().len(),
            study_path,
            control_path,
        })
    }

    /// One plate through the pipeline: load, ratio, extract, filter,
    /// partition, normalize, record.
    fn process_plate(&mut self, folder: &Path, observer: &mut dyn PlateObserver) -> Result<()> {
        let plate = loader::load_plate(folder)?;
        info!(plate = %plate.name, shape = ?plate.hem.shape(), "processing plate");

        let ratio = ratio_grid(&plate.hem, &plate.spot)?;
        let groups = extract_groups(&ratio, &plate.layout)?;
        observer.after_extraction(&plate.name, &groups)?;

        let filtered: GroupMap = groups
            .into_iter()
            .map(|(name, values)| {
                let kept = self.filter.filter(&values);
                (name, kept)
            })
            .collect();
        observer.after_filtering(&plate.name, &filtered)?;

        let (mut study, mut control) = partition_roles(&filtered, &plate.config)?;
        normalize_plate(&mut study, &mut control, &plate.config)?;
        observer.after_normalization(&plate.name, &study, &control)?;

        self.pools.record_plate(&study, &control);
        Ok(())
    }
}
