//! Plate discovery and per-plate input data.
//!
//! A plate is one experimental unit folder containing aligned hem/spot/
//! layout grids and its own `plate.yaml` configuration.

pub mod loader;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{Grid, PlateConfig};

/// One plate's loaded input tables and configuration.
#[derive(Debug, Clone)]
pub struct Plate {
    /// Folder name, used to identify the plate in errors and dumps.
    pub name: String,
    /// Hemolysis measurement grid.
    pub hem: Grid<f64>,
    /// Spot intensity grid.
    pub spot: Grid<f64>,
    /// Group label grid.
    pub layout: Grid<String>,
    /// Study/control declarations and control mapping.
    pub config: PlateConfig,
}

/// Enumerates plate folders under the data directory.
///
/// Only directories count; regular files (including the final pooled
/// artifacts from a previous run) are skipped. Folders are sorted by name
/// so pooled append order is reproducible across filesystems.
pub fn discover_plates(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data folder: {}", data_dir.display()))?;

    let mut plates = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list data folder: {}", data_dir.display()))?;
        let path = entry.path();

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            plates.push(path);
        } else {
            debug!(entry = %name, "skipping non-directory entry");
        }
    }

    plates.sort();
    Ok(plates)
}

/// Returns the plate folder name used in error messages and dumps.
pub fn plate_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_discover_plates_sorted_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("plate_b")).unwrap();
        fs::create_dir(dir.path().join("plate_a")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("study_groups.json")).unwrap();

        let plates = discover_plates(dir.path()).unwrap();
        let names: Vec<String> = plates.iter().map(|p| plate_name(p)).collect();
        assert_eq!(names, ["plate_a", "plate_b"]);
    }

    #[test]
    fn test_discover_plates_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_plates(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_plates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_plates(&missing).is_err());
    }
}
