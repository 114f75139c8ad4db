//! Pooled-result artifact generation.
//!
//! Writes the two final artifacts at the data-folder root:
//! `study_groups.json` and `control_groups.json`, each a JSON object
//! mapping group name to the ordered array of normalized values.

pub mod observer;

use crate::analysis::{Aggregator, Pool};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the pooled study-group artifact.
pub const STUDY_ARTIFACT: &str = "study_groups.json";
/// File name of the pooled control-group artifact.
pub const CONTROL_ARTIFACT: &str = "control_groups.json";

/// Serializes a pool to pretty-printed JSON.
pub fn generate_pool_json(pool: &Pool) -> Result<String> {
    serde_json::to_string_pretty(pool).map_err(Into::into)
}

/// Writes both pooled artifacts. Returns the written paths (study, control).
pub fn write_pools(data_dir: &Path, aggregator: &Aggregator) -> Result<(PathBuf, PathBuf)> {
    let study_path = data_dir.join(STUDY_ARTIFACT);
    let control_path = data_dir.join(CONTROL_ARTIFACT);

    write_pool(aggregator.study(), &study_path)?;
    write_pool(aggregator.control(), &control_path)?;

    info!(
        study = %study_path.display(),
        control = %control_path.display(),
        "wrote pooled artifacts"
    );
    Ok((study_path, control_path))
}

fn write_pool(pool: &Pool, path: &Path) -> Result<()> {
    let content = generate_pool_json(pool)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write artifact: {}", path.display()))
}
