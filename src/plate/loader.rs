//! Plate input loading: CSV grids and `plate.yaml`.
//!
//! Thin I/O wrappers around the csv and serde_yaml parsers; all shape and
//! semantic checks live in the core pipeline.

use anyhow::{Context, Result};
use std::path::Path;

use super::{plate_name, Plate};
use crate::models::{Grid, PlateConfig};

/// Loads the three tables and the plate configuration from one folder.
///
/// Expects fixed file names: `hem.csv`, `spot.csv`, `layout.csv`,
/// `plate.yaml`.
pub fn load_plate(folder: &Path) -> Result<Plate> {
    let hem = load_numeric_grid(&folder.join("hem.csv"))?;
    let spot = load_numeric_grid(&folder.join("spot.csv"))?;
    let layout = load_layout_grid(&folder.join("layout.csv"))?;
    let config = load_plate_config(&folder.join("plate.yaml"))?;

    Ok(Plate {
        name: plate_name(folder),
        hem,
        spot,
        layout,
        config,
    })
}

/// Reads a headerless CSV of floats into a grid.
fn load_numeric_grid(path: &Path) -> Result<Grid<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let row: Vec<f64> = record
            .iter()
            .enumerate()
            .map(|(j, field)| {
                field.parse::<f64>().with_context(|| {
                    format!(
                        "{}: row {}, column {}: '{}' is not a number",
                        path.display(),
                        i,
                        j,
                        field
                    )
                })
            })
            .collect::<Result<_>>()?;
        rows.push(row);
    }

    Grid::from_rows(rows).with_context(|| format!("Malformed grid in {}", path.display()))
}

/// Reads a headerless CSV of group labels into a grid.
fn load_layout_grid(path: &Path) -> Result<Grid<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        rows.push(record.iter().map(String::from).collect());
    }

    Grid::from_rows(rows).with_context(|| format!("Malformed grid in {}", path.display()))
}

/// Parses `plate.yaml` into the plate configuration.
fn load_plate_config(path: &Path) -> Result<PlateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
