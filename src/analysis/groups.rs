//! Group extraction and role partitioning.
//!
//! Partitions the ratio grid into named group samples using the parallel
//! layout grid, then splits the extracted groups into study and control
//! maps according to the plate configuration.

use crate::error::PipelineError;
use crate::models::{Grid, GroupMap, PlateConfig};

/// Partitions ratio values by their layout label.
///
/// Every grid position lands in exactly one group; cells are visited in
/// row-major order so each sample's internal order is deterministic, and
/// the returned map iterates in sorted label order.
pub fn extract_groups(
    ratio: &Grid<f64>,
    layout: &Grid<String>,
) -> Result<GroupMap, PipelineError> {
    if ratio.shape() != layout.shape() {
        return Err(PipelineError::ShapeMismatch {
            left_name: "ratio grid",
            left: ratio.shape(),
            right_name: "layout.csv",
            right: layout.shape(),
        });
    }

    let mut groups = GroupMap::new();
    for ((row, col), label) in layout.iter_cells() {
        groups
            .entry(label.clone())
            .or_default()
            .push(*ratio.get(row, col));
    }

    Ok(groups)
}

/// Splits extracted groups into (study, control) maps per the plate
/// configuration.
///
/// Groups on the plate that the configuration never references are
/// dropped. A declared name with no extracted sample is `MissingGroup`.
pub fn partition_roles(
    groups: &GroupMap,
    config: &PlateConfig,
) -> Result<(GroupMap, GroupMap), PipelineError> {
    let pick = |names: &[String]| -> Result<GroupMap, PipelineError> {
        names
            .iter()
            .map(|name| {
                groups
                    .get(name)
                    .map(|values| (name.clone(), values.clone()))
                    .ok_or_else(|| PipelineError::MissingGroup(name.clone()))
            })
            .collect()
    };

    let study = pick(&config.groups.study)?;
    let control = pick(&config.groups.control)?;
    Ok((study, control))
}
