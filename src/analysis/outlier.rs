//! IQR outlier filtering with Tukey fences.
//!
//! Keeps values inside [Q1 - k*IQR, Q3 + k*IQR], where Q1/Q3 are the
//! configured percentiles of the sample. Resistant to extreme outliers
//! that would inflate a stddev-based bound.

use crate::error::PipelineError;
use tracing::debug;

/// Quartile interpolation is not meaningful below this sample size;
/// smaller samples pass through unfiltered.
const MIN_FILTER_SIZE: usize = 4;

/// An IQR outlier filter bound to its parameters.
///
/// Pure: `filter` never mutates, reorders, or invents values, it only
/// selects an order-preserving subsequence of its input.
#[derive(Debug, Clone, PartialEq)]
pub struct IqrFilter {
    lower_percentile: f64,
    upper_percentile: f64,
    multiplier: f64,
}

impl Default for IqrFilter {
    fn default() -> Self {
        Self {
            lower_percentile: 25.0,
            upper_percentile: 75.0,
            multiplier: 1.5,
        }
    }
}

impl IqrFilter {
    /// Creates a filter, validating the parameter ranges.
    pub fn new(
        lower_percentile: f64,
        upper_percentile: f64,
        multiplier: f64,
    ) -> Result<Self, PipelineError> {
        if !(0.0..=100.0).contains(&lower_percentile) || !(0.0..=100.0).contains(&upper_percentile)
        {
            return Err(PipelineError::Config(format!(
                "percentiles must lie in [0, 100], got {} and {}",
                lower_percentile, upper_percentile
            )));
        }
        if lower_percentile >= upper_percentile {
            return Err(PipelineError::Config(format!(
                "lower percentile {} must be below upper percentile {}",
                lower_percentile, upper_percentile
            )));
        }
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(PipelineError::Config(format!(
                "IQR multiplier must be non-negative, got {}",
                multiplier
            )));
        }

        Ok(Self {
            lower_percentile,
            upper_percentile,
            multiplier,
        })
    }

    /// Returns the subsequence of `values` inside the Tukey fences.
    ///
    /// Samples smaller than four values are returned unchanged.
    pub fn filter(&self, values: &[f64]) -> Vec<f64> {
        if values.len() < MIN_FILTER_SIZE {
            debug!(
                len = values.len(),
                "sample too small for quartile estimation, skipping filter"
            );
            return values.to_vec();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = percentile(&sorted, self.lower_percentile);
        let q3 = percentile(&sorted, self.upper_percentile);
        let iqr = q3 - q1;
        let lower_fence = q1 - self.multiplier * iqr;
        let upper_fence = q3 + self.multiplier * iqr;

        let retained: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| (lower_fence..=upper_fence).contains(v))
            .collect();

        if retained.len() < values.len() {
            debug!(
                removed = values.len() - retained.len(),
                total = values.len(),
                "removed outliers"
            );
        }

        retained
    }
}

/// Compute a percentile of a sorted sample using linear interpolation
/// between order statistics.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
