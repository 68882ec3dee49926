//! Drift
//!
//! Distribution drift between a reference dataset and a current dataset: feature
//! selection, per-feature Kolmogorov-Smirnov tests, aggregation into a
//! [`DriftReport`] and the threshold check.
pub mod calculation;
pub mod report;
pub mod selection;
pub mod stats;

pub use calculation::{calculate_drift, calculate_feature_drift, detect_drift};
pub use report::{exceeds, DriftReport, FeatureDriftResult, ReportDocument};
pub use selection::select_features;
pub use stats::{ks_2samp, KsMethod, KsTest};
