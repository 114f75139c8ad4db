//! Cross-plate accumulation of normalized group values.
//!
//! The aggregator owns two pools (study, control) that grow by one append
//! per plate per group and are serialized once at the end of the run.

use crate::models::GroupMap;
use serde::{Deserialize, Serialize};

/// A pool of normalized values keyed by group name.
///
/// Serializes as a plain JSON object so the written artifact is exactly
/// the mapping, re-parseable into the same `Pool`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pool {
    groups: GroupMap,
}

impl Pool {
    /// Appends `values` to the sequence for `group_name`, creating the
    /// entry when absent.
    pub fn record(&mut self, group_name: &str, values: &[f64]) {
        self.groups
            .entry(group_name.to_string())
            .or_default()
            .extend_from_slice(values);
    }

    /// Number of groups in the pool.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no group has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The accumulated values for a group, if any.
    pub fn get(&self, group_name: &str) -> Option<&[f64]> {
        self.groups.get(group_name).map(Vec::as_slice)
    }
}

/// The two process-wide pools accumulated across all plates.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    study: Pool,
    control: Pool,
}

impl Aggregator {
    /// Records one plate's normalized study and control groups.
    pub fn record_plate(&mut self, study: &GroupMap, control: &GroupMap) {
        for (name, values) in study {
            self.study.record(name, values);
        }
        for (name, values) in control {
            self.control.record(name, values);
        }
    }

    /// The pooled study groups.
    pub fn study(&self) -> &Pool {
        &self.study
    }

    /// The pooled control groups.
    pub fn control(&self) -> &Pool {
        &self.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_then_appends() {
        let mut pool = Pool::default();
        assert!(pool.is_empty());

        pool.record("g", &[1.0, 2.0]);
        pool.record("g", &[3.0]);
        pool.record("h", &[4.0]);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("g"), Some([1.0, 2.0, 3.0].as_slice()));
        assert_eq!(pool.get("h"), Some([4.0].as_slice()));
        assert_eq!(pool.get("missing"), None);
    }

    #[test]
    fn test_aggregator_keeps_pools_independent() {
        let mut agg = Aggregator::default();
        let study: GroupMap = [("shared".to_string(), vec![1.0])].into_iter().collect();
        let control: GroupMap = [("shared".to_string(), vec![2.0])].into_iter().collect();

        agg.record_plate(&study, &control);
        agg.record_plate(&study, &control);

        assert_eq!(agg.study().get("shared"), Some([1.0, 1.0].as_slice()));
        assert_eq!(agg.control().get("shared"), Some([2.0, 2.0].as_slice()));
    }

    #[test]
    fn test_pool_json_round_trip() {
        let mut pool = Pool::default();
        pool.record("beta", &[0.5, 1.25]);
        pool.record("alpha", &[2.0]);

        let json = serde_json::to_string_pretty(&pool).unwrap();
        let parsed: Pool = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pool);

        // transparent serialization: the artifact is the mapping itself,
        // with keys in sorted order
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["alpha", "beta"]);
    }
}
