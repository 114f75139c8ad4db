//! Core normalization pipeline: outlier filtering, group extraction,
//! control-relative normalization, and cross-plate aggregation.

pub mod aggregator;
pub mod groups;
pub mod normalize;
pub mod outlier;

pub use aggregator::{Aggregator, Pool};
pub use groups::{extract_groups, partition_roles};
pub use normalize::normalize_plate;
pub use outlier::IqrFilter;
