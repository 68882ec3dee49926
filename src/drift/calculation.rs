use crate::data::{Column, Dataset};
use crate::drift::report::{DriftReport, FeatureDriftResult};
use crate::drift::selection::select_features;
use crate::drift::stats::{ks_2samp, KsMethod};
use crate::errors::DriftError;
use chrono::{DateTime, Utc};
use rayon::prelude::*;

/// Compare one feature of the reference dataset with the same feature of the current dataset.
///
/// Returns `None` when either side has no eligible value, i.e. every cell is missing
/// or the current column is not numeric.
pub fn calculate_feature_drift(reference: &Column, current: &Column, method: KsMethod) -> Option<FeatureDriftResult> {
    let reference_values = reference.numeric_values()?;
    let current_values = current.numeric_values()?;
    let test = ks_2samp(reference_values, current_values, method)?;
    Some(FeatureDriftResult::from_test(reference.name(), &test))
}

/// Calculate drift for each of the given features.
///
/// # Arguments
///
/// * `reference` - The baseline dataset.
/// * `current` - The dataset under evaluation.
/// * `features` - Features to compare, usually from [`select_features`].
/// * `method` - How KS p-values are computed.
/// * `parallel` - Whether to test features in parallel. Results come back in no
///   particular order either way.
pub fn calculate_drift(
    reference: &Dataset,
    current: &Dataset,
    features: &[String],
    method: KsMethod,
    parallel: bool,
) -> Vec<FeatureDriftResult> {
    let compare = |name: &String| -> Option<FeatureDriftResult> {
        let r = reference.column(name)?;
        let c = current.column(name)?;
        calculate_feature_drift(r, c, method)
    };

    if parallel {
        features.par_iter().filter_map(compare).collect()
    } else {
        features.iter().filter_map(compare).collect()
    }
}

/// Compare two datasets and aggregate the outcome into a [`DriftReport`].
///
/// # Arguments
///
/// * `reference` - The baseline dataset.
/// * `current` - The dataset under evaluation.
/// * `target_columns` - Label columns left out of the comparison.
/// * `method` - How KS p-values are computed.
/// * `parallel` - Whether to test features in parallel.
/// * `timestamp` - When the comparison ran.
pub fn detect_drift<S: AsRef<str>>(
    reference: &Dataset,
    current: &Dataset,
    target_columns: &[S],
    method: KsMethod,
    parallel: bool,
    timestamp: DateTime<Utc>,
) -> Result<DriftReport, DriftError> {
    let features = select_features(reference, current, target_columns);
    let results = calculate_drift(reference, current, &features, method, parallel);
    DriftReport::from_results(results, timestamp)
}
