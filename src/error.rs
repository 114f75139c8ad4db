//! Pipeline error taxonomy.
//!
//! Every variant aborts the run; nothing here is recovered locally.
//! The runner wraps these with the offending plate folder via `anyhow`
//! context before they reach the user.

use thiserror::Error;

/// Errors produced by the core normalization pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// Malformed or inconsistent configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Two grids that must align have different shapes.
    #[error("shape mismatch: {left_name} is {left:?} but {right_name} is {right:?}")]
    ShapeMismatch {
        left_name: &'static str,
        left: (usize, usize),
        right_name: &'static str,
        right: (usize, usize),
    },

    /// A group referenced by the plate configuration was never extracted
    /// from the layout, or falls in the wrong role partition.
    #[error("group '{0}' is not present among the extracted plate groups")]
    MissingGroup(String),

    /// A control group's mean is unusable as a normalization divisor.
    #[error("control group '{group}' has degenerate mean {mean} (cannot normalize)")]
    DegenerateControl { group: String, mean: f64 },

    /// hem/spot division produced a non-finite value (spot zero or NaN input).
    #[error("non-finite ratio at row {row}, column {col}: hem={hem}, spot={spot}")]
    NonFiniteRatio {
        row: usize,
        col: usize,
        hem: f64,
        spot: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = PipelineError::ShapeMismatch {
            left_name: "hem.csv",
            left: (8, 12),
            right_name: "spot.csv",
            right: (8, 11),
        };
        let msg = err.to_string();
        assert!(msg.contains("hem.csv"));
        assert!(msg.contains("(8, 12)"));
        assert!(msg.contains("(8, 11)"));
    }

    #[test]
    fn test_missing_group_display() {
        let err = PipelineError::MissingGroup("ctrl_pos".to_string());
        assert!(err.to_string().contains("ctrl_pos"));
    }
}
