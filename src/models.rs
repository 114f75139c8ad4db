//! Data models for the normalization pipeline.
//!
//! This module contains the core data structures shared across the
//! pipeline: rectangular grids, the per-plate configuration, and the
//! group-sample mapping type.

use crate::error::PipelineError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Named group samples, sorted by group name for deterministic iteration
/// and output.
pub type GroupMap = BTreeMap<String, Vec<f64>>;

/// A rectangular 2-D grid stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from parsed CSV rows. Fails if rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, PipelineError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(PipelineError::Config(format!(
                    "ragged grid: row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Grid shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cell at (row, col). Panics on out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> &T {
        assert!(row < self.rows && col < self.cols, "grid index out of range");
        &self.cells[row * self.cols + col]
    }

    /// Iterate cells in row-major order with their positions.
    pub fn iter_cells(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| ((i / self.cols, i % self.cols), v))
    }
}

/// Computes the per-well ratio grid: cell (i,j) = hem(i,j) / spot(i,j).
///
/// A non-finite result (spot zero, NaN input) fails the plate rather than
/// flowing into percentile sorting and control means downstream.
pub fn ratio_grid(hem: &Grid<f64>, spot: &Grid<f64>) -> Result<Grid<f64>, PipelineError> {
    if hem.shape() != spot.shape() {
        return Err(PipelineError::ShapeMismatch {
            left_name: "hem.csv",
            left: hem.shape(),
            right_name: "spot.csv",
            right: spot.shape(),
        });
    }

    let (rows, cols) = hem.shape();
    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let h = *hem.get(r, c);
            let s = *spot.get(r, c);
            let ratio = h / s;
            if !ratio.is_finite() {
                return Err(PipelineError::NonFiniteRatio {
                    row: r,
                    col: c,
                    hem: h,
                    spot: s,
                });
            }
            cells.push(ratio);
        }
    }

    Ok(Grid { rows, cols, cells })
}

/// Per-plate configuration loaded from `plate.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlateConfig {
    /// Study/control role declarations.
    pub groups: GroupRoles,
    /// Control group name -> study groups it normalizes.
    pub mapping: BTreeMap<String, Vec<String>>,
}

/// Role declarations for the groups on a plate.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRoles {
    /// Groups under study.
    pub study: Vec<String>,
    /// Control groups used as normalization references.
    pub control: Vec<String>,
}
