//! Experiment configuration handling.
//!
//! This module handles loading the optional top-level `config.yaml` and
//! turning it into a bound outlier filter. A missing file or a null
//! `outliar_removing` block selects the defaults (25/75/1.5).

use crate::analysis::IqrFilter;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root experiment configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentConfig {
    /// Outlier removal settings. The misspelled key is part of the wire
    /// format inherited from existing experiment folders.
    #[serde(default)]
    pub outliar_removing: Option<OutlierRemoval>,
}

/// Outlier removal method selection and parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlierRemoval {
    /// Removal method; IQR is the only supported method.
    pub method: OutlierMethod,

    /// Percentile used as Q1.
    #[serde(default = "default_lower_percentile")]
    pub lower_percentile: f64,

    /// Percentile used as Q3.
    #[serde(default = "default_upper_percentile")]
    pub upper_percentile: f64,

    /// Fence multiplier k in [Q1 - k*IQR, Q3 + k*IQR].
    #[serde(default = "default_range")]
    pub range: f64,
}

impl Default for OutlierRemoval {
    fn default() -> Self {
        Self {
            method: OutlierMethod::Iqr,
            lower_percentile: default_lower_percentile(),
            upper_percentile: default_upper_percentile(),
            range: default_range(),
        }
    }
}

/// Supported outlier removal methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OutlierMethod {
    #[serde(rename = "IQR")]
    Iqr,
}

fn default_lower_percentile() -> f64 {
    25.0
}

fn default_upper_percentile() -> f64 {
    75.0
}

fn default_range() -> f64 {
    1.5
}

impl ExperimentConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ExperimentConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `config.yaml` from the data folder root.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default(data_dir: &Path) -> Result<Option<Self>> {
        let default_path = data_dir.join("config.yaml");

        if default_path.exists() {
            Ok(Some(Self::load(&default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Constructs the outlier filter bound to this configuration.
    pub fn outlier_filter(&self) -> Result<IqrFilter> {
        let removal = self.outliar_removing.clone().unwrap_or_default();
        let OutlierMethod::Iqr = removal.method;

        let filter = IqrFilter::new(
            removal.lower_percentile,
            removal.upper_percentile,
            removal.range,
        )
        .context("Invalid outliar_removing parameters")?;

        Ok(filter)
    }
}
