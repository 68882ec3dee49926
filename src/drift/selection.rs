//! Feature selection
//!
//! Decides which columns of two datasets can be compared with a KS test.
use crate::data::{ColumnKind, Dataset};
use std::collections::BTreeSet;

/// Names of the features to compare, in lexicographic order.
///
/// A feature qualifies when it is present in both datasets, is numeric in the
/// reference dataset, and is not one of `target_columns`. Everything else is left out
/// silently, including the label, since label drift is not feature drift.
///
/// * `reference` - Baseline dataset.
/// * `current` - Dataset under evaluation.
/// * `target_columns` - Label columns never compared.
pub fn select_features<S: AsRef<str>>(reference: &Dataset, current: &Dataset, target_columns: &[S]) -> Vec<String> {
    let targets: BTreeSet<&str> = target_columns.iter().map(|t| t.as_ref()).collect();
    reference
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .filter(|c| !targets.contains(c.name()))
        .filter(|c| current.contains(c.name()))
        .map(|c| c.name().to_string())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
