//! Per-plate checkpoint observer.
//!
//! The pipeline invokes an observer at three defined checkpoints
//! (post-extraction, post-filter, post-normalization) instead of writing
//! debug dumps inline, so the core stays testable without a filesystem.

use crate::models::GroupMap;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Observer invoked at the pipeline's per-plate checkpoints.
///
/// All hooks default to no-ops; implementors override the checkpoints
/// they care about. Hook failures abort the run like any other error.
pub trait PlateObserver {
    /// Called after group extraction, before outlier filtering.
    fn after_extraction(&mut self, _plate: &str, _groups: &GroupMap) -> Result<()> {
        Ok(())
    }

    /// Called after per-group outlier filtering.
    fn after_filtering(&mut self, _plate: &str, _groups: &GroupMap) -> Result<()> {
        Ok(())
    }

    /// Called after normalization, with the final study/control maps.
    fn after_normalization(
        &mut self,
        _plate: &str,
        _study: &GroupMap,
        _control: &GroupMap,
    ) -> Result<()> {
        Ok(())
    }
}

/// Observer that does nothing.
#[derive(Debug, Default)]
pub struct NullObserver;

impl PlateObserver for NullObserver {}

/// Observer that dumps each checkpoint as JSON under `<plate>/debug/`.
///
/// Diagnostic only; the dump files are not part of the output contract.
#[derive(Debug)]
pub struct DebugDumper {
    data_dir: PathBuf,
}

impl DebugDumper {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn dump(&self, plate: &str, file: &str, groups: &GroupMap) -> Result<()> {
        let debug_dir = self.data_dir.join(plate).join("debug");
        std::fs::create_dir_all(&debug_dir)
            .with_context(|| format!("Failed to create {}", debug_dir.display()))?;

        let path = debug_dir.join(file);
        let content = serde_json::to_string_pretty(groups)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(plate = %plate, dump = %file, "wrote debug dump");
        Ok(())
    }
}

impl PlateObserver for DebugDumper {
    fn after_extraction(&mut self, plate: &str, groups: &GroupMap) -> Result<()> {
        self.dump(plate, "groups_extracted.json", groups)
    }

    fn after_filtering(&mut self, plate: &str, groups: &GroupMap) -> Result<()> {
        self.dump(plate, "groups_filtered.json", groups)
    }

    fn after_normalization(
        &mut self,
        plate: &str,
        study: &GroupMap,
        control: &GroupMap,
    ) -> Result<()> {
        self.dump(plate, "study_groups_normalized.json", study)?;
        self.dump(plate, "control_groups_normalized.json", control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_groups() -> GroupMap {
        [("g".to_string(), vec![1.0, 2.0])].into_iter().collect()
    }

    #[test]
    fn test_null_observer_is_silent() {
        let mut obs = NullObserver;
        obs.after_extraction("p1", &sample_groups()).unwrap();
        obs.after_filtering("p1", &sample_groups()).unwrap();
        obs.after_normalization("p1", &sample_groups(), &sample_groups())
            .unwrap();
    }

    #[test]
    fn test_debug_dumper_writes_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("p1")).unwrap();

        let mut obs = DebugDumper::new(dir.path().to_path_buf());
        obs.after_extraction("p1", &sample_groups()).unwrap();
        obs.after_filtering("p1", &sample_groups()).unwrap();
        obs.after_normalization("p1", &sample_groups(), &sample_groups())
            .unwrap();

        let debug_dir = dir.path().join("p1").join("debug");
        for file in [
            "groups_extracted.json",
            "groups_filtered.json",
            "study_groups_normalized.json",
            "control_groups_normalized.json",
        ] {
            let content = std::fs::read_to_string(debug_dir.join(file)).unwrap();
            let parsed: GroupMap = serde_json::from_str(&content).unwrap();
            assert_eq!(parsed, sample_groups());
        }
    }
}
