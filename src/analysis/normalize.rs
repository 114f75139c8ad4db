//! Control-relative normalization.
//!
//! Rescales each study group by the mean of its mapped control group, then
//! rescales the control group itself. Means are computed on the already
//! outlier-filtered samples.

use crate::error::PipelineError;
use crate::models::{GroupMap, PlateConfig};
use tracing::debug;

/// Normalizes study and control groups in place.
///
/// For each control group C (sorted order): `m = mean(control[C])` is
/// computed exactly once, every study group in `mapping[C]` is divided
/// element-wise by `m`, and finally C itself is divided by `m`. A control
/// group is never divided twice, regardless of how many study groups it
/// maps to.
pub fn normalize_plate(
    study: &mut GroupMap,
    control: &mut GroupMap,
    config: &PlateConfig,
) -> Result<(), PipelineError> {
    // Mapping keys must all be declared control groups.
    for name in config.mapping.keys() {
        if !control.contains_key(name) {
            return Err(PipelineError::MissingGroup(name.clone()));
        }
    }

    // Every study group must be normalized by some control; a study group
    // no mapping entry references would otherwise reach the pool raw.
    for name in study.keys() {
        let mapped = config
            .mapping
            .values()
            .any(|targets| targets.iter().any(|s| s == name));
        if !mapped {
            return Err(PipelineError::Config(format!(
                "study group '{}' has no mapping entry",
                name
            )));
        }
    }

    // Sorted iteration keeps cumulative division deterministic when a
    // study group is mapped from more than one control.
    let control_names: Vec<String> = control.keys().cloned().collect();
    for name in control_names {
        let mapped = config.mapping.get(&name).ok_or_else(|| {
            PipelineError::Config(format!("control group '{}' has no mapping entry", name))
        })?;

        let m = mean(&control[&name]);
        if !m.is_finite() || m == 0.0 {
            return Err(PipelineError::DegenerateControl {
                group: name.clone(),
                mean: m,
            });
        }
        debug!(control = %name, mean = m, "normalizing against control mean");

        for study_name in mapped {
            let values = study
                .get_mut(study_name)
                .ok_or_else(|| PipelineError::MissingGroup(study_name.clone()))?;
            for v in values.iter_mut() {
                *v /= m;
            }
        }

        if let Some(values) = control.get_mut(&name) {
            for v in values.iter_mut() {
                *v /= m;
            }
        }
    }

    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupRoles;
    use std::collections::BTreeMap;

    fn config(
        study: &[&str],
        control: &[&str],
        mapping: &[(&str, &[&str])],
    ) -> PlateConfig {
        PlateConfig {
            groups: GroupRoles {
                study: study.iter().map(|s| s.to_string()).collect(),
                control: control.iter().map(|s| s.to_string()).collect(),
            },
            mapping: mapping
                .iter()
                .map(|(c, ss)| (c.to_string(), ss.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    fn groups(entries: &[(&str, &[f64])]) -> GroupMap {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), values.to_vec()))
            .collect::<BTreeMap<_, _>>()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{} != {}", a, e);
        }
    }

    #[test]
    fn test_worked_example() {
        // ratio [[1,2],[3,4]], layout [[A,A],[B,B]], mapping B -> [A]
        let mut study = groups(&[("A", &[1.0, 2.0])]);
        let mut control = groups(&[("B", &[3.0, 4.0])]);
        let config = config(&["A"], &["B"], &[("B", &["A"])]);

        normalize_plate(&mut study, &mut control, &config).unwrap();

        assert_close(&study["A"], &[0.2857, 0.5714]);
        assert_close(&control["B"], &[0.8571, 1.1429]);
    }

    #[test]
    fn test_control_divided_once_with_multiple_study_groups() {
        let mut study = groups(&[("s1", &[4.0]), ("s2", &[8.0])]);
        let mut control = groups(&[("c", &[2.0, 2.0])]);
        let config = config(&["s1", "s2"], &["c"], &[("c", &["s1", "s2"])]);

        normalize_plate(&mut study, &mut control, &config).unwrap();

        // both study groups see the same mean of 2.0, and the control is
        // divided by it exactly once
        assert_close(&study["s1"], &[2.0]);
        assert_close(&study["s2"], &[4.0]);
        assert_close(&control["c"], &[1.0, 1.0]);
    }

    #[test]
    fn test_mean_uses_filtered_sample_as_given() {
        // the normalizer trusts its input; the caller filters first
        let mut study = groups(&[("s", &[10.0])]);
        let mut control = groups(&[("c", &[5.0])]);
        let config = config(&["s"], &["c"], &[("c", &["s"])]);

        normalize_plate(&mut study, &mut control, &config).unwrap();
        assert_close(&study["s"], &[2.0]);
        assert_close(&control["c"], &[1.0]);
    }

    #[test]
    fn test_degenerate_zero_mean() {
        let mut study = groups(&[("s", &[1.0])]);
        let mut control = groups(&[("c", &[-1.0, 1.0])]);
        let config = config(&["s"], &["c"], &[("c", &["s"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateControl { .. }));
    }

    #[test]
    fn test_degenerate_empty_control() {
        // a control fully consumed by outlier filtering has a NaN mean
        let mut study = groups(&[("s", &[1.0])]);
        let mut control = groups(&[("c", &[])]);
        let config = config(&["s"], &["c"], &[("c", &["s"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        match err {
            PipelineError::DegenerateControl { group, mean } => {
                assert_eq!(group, "c");
                assert!(mean.is_nan());
            }
            other => panic!("expected DegenerateControl, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_to_unknown_study_group() {
        let mut study = groups(&[("s", &[1.0])]);
        let mut control = groups(&[("c", &[2.0])]);
        let config = config(&["s"], &["c"], &[("c", &["ghost"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        assert_eq!(err, PipelineError::MissingGroup("ghost".into()));
    }

    #[test]
    fn test_mapping_key_not_a_control_group() {
        let mut study = groups(&[("s", &[1.0])]);
        let mut control = groups(&[("c", &[2.0])]);
        let config = config(&["s"], &["c"], &[("c", &["s"]), ("ghost", &["s"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        assert_eq!(err, PipelineError::MissingGroup("ghost".into()));
    }

    #[test]
    fn test_study_group_without_mapping_entry() {
        let mut study = groups(&[("s", &[1.0]), ("stray", &[7.0, 7.0])]);
        let mut control = groups(&[("c", &[2.0])]);
        let config = config(&["s", "stray"], &["c"], &[("c", &["s"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        match err {
            PipelineError::Config(msg) => assert!(msg.contains("stray")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_control_without_mapping_entry() {
        let mut study = groups(&[("s", &[1.0])]);
        let mut control = groups(&[("c", &[2.0]), ("lonely", &[3.0])]);
        let config = config(&["s"], &["c", "lonely"], &[("c", &["s"])]);

        let err = normalize_plate(&mut study, &mut control, &config).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
