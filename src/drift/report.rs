//! Drift Report
//!
//! Per-feature results, their aggregation into a single [`DriftReport`], and the
//! threshold check deciding whether the drift calls for action.
use crate::constants::SIGNIFICANCE_LEVEL;
use crate::drift::stats::KsTest;
use crate::errors::DriftError;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of the KS test for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDriftResult {
    feature_name: String,
    statistic: f64,
    p_value: f64,
    drifted: bool,
    reference_size: usize,
    current_size: usize,
}

impl FeatureDriftResult {
    /// Create a feature result, `drifted` follows from the fixed significance level.
    ///
    /// * `feature_name` - Name of the compared feature.
    /// * `statistic` - KS statistic.
    /// * `p_value` - p-value of the statistic.
    /// * `reference_size` - Number of non-missing reference values.
    /// * `current_size` - Number of non-missing current values.
    pub fn new(
        feature_name: impl Into<String>,
        statistic: f64,
        p_value: f64,
        reference_size: usize,
        current_size: usize,
    ) -> Self {
        FeatureDriftResult {
            feature_name: feature_name.into(),
            statistic,
            p_value,
            drifted: p_value < SIGNIFICANCE_LEVEL,
            reference_size,
            current_size,
        }
    }

    pub fn from_test(feature_name: impl Into<String>, test: &KsTest) -> Self {
        Self::new(feature_name, test.statistic, test.p_value, test.n_reference, test.n_current)
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// KS statistic, in `[0, 1]`.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// p-value, in `[0, 1]`.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn drifted(&self) -> bool {
        self.drifted
    }

    pub fn reference_size(&self) -> usize {
        self.reference_size
    }

    pub fn current_size(&self) -> usize {
        self.current_size
    }

    fn validate(&self) -> Result<(), DriftError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.statistic) {
            return Err(DriftError::InvalidResult(
                self.feature_name.clone(),
                format!("statistic {} outside of [0, 1]", self.statistic),
            ));
        }
        if !in_unit(self.p_value) {
            return Err(DriftError::InvalidResult(
                self.feature_name.clone(),
                format!("p-value {} outside of [0, 1]", self.p_value),
            ));
        }
        if self.drifted != (self.p_value < SIGNIFICANCE_LEVEL) {
            return Err(DriftError::InvalidResult(
                self.feature_name.clone(),
                format!("drifted={} does not match p-value {}", self.drifted, self.p_value),
            ));
        }
        Ok(())
    }
}

/// Aggregate outcome of comparing a reference dataset with a current dataset.
///
/// Built once by [`DriftReport::from_results`], which establishes
/// * `total_features == feature_results.len()`
/// * `drifted_features` are exactly the drifted keys of `feature_results`
/// * `drift_share == |drifted_features| / total_features`, `0` without features
/// * `drift_detected == !drifted_features.is_empty()`
///
/// Serializing a report yields its structured document, see [`ReportDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReportDocument", try_from = "ReportDocument")]
pub struct DriftReport {
    drift_detected: bool,
    drift_share: f64,
    drifted_features: BTreeSet<String>,
    total_features: usize,
    feature_results: HashMap<String, FeatureDriftResult>,
    timestamp: DateTime<Utc>,
}

impl DriftReport {
    /// Aggregate per-feature results into a report.
    ///
    /// The result does not depend on the order of `results`.
    ///
    /// * `results` - One result per compared feature.
    /// * `timestamp` - When the comparison ran.
    pub fn from_results<I>(results: I, timestamp: DateTime<Utc>) -> Result<Self, DriftError>
    where
        I: IntoIterator<Item = FeatureDriftResult>,
    {
        let mut feature_results: HashMap<String, FeatureDriftResult> = HashMap::new();
        for result in results {
            result.validate()?;
            if feature_results.contains_key(result.feature_name()) {
                return Err(DriftError::DuplicateFeature(result.feature_name().to_string()));
            }
            feature_results.insert(result.feature_name().to_string(), result);
        }

        let drifted_features: BTreeSet<String> = feature_results
            .values()
            .filter(|r| r.drifted())
            .map(|r| r.feature_name().to_string())
            .collect();
        let total_features = feature_results.len();
        let drift_share = if total_features == 0 { 0.0 } else { drifted_features.len() as f64 / total_features as f64 };

        Ok(DriftReport {
            drift_detected: !drifted_features.is_empty(),
            drift_share,
            drifted_features,
            total_features,
            feature_results,
            timestamp,
        })
    }

    /// Whether at least one feature drifted.
    pub fn drift_detected(&self) -> bool {
        self.drift_detected
    }

    /// Share of compared features that drifted, in `[0, 1]`.
    pub fn drift_share(&self) -> f64 {
        self.drift_share
    }

    /// Names of the drifted features, in lexicographic order.
    pub fn drifted_features(&self) -> &BTreeSet<String> {
        &self.drifted_features
    }

    pub fn total_features(&self) -> usize {
        self.total_features
    }

    pub fn feature_results(&self) -> &HashMap<String, FeatureDriftResult> {
        &self.feature_results
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureDriftResult> {
        self.feature_results.get(name)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Feature results ordered by feature name.
    pub fn sorted_results(&self) -> Vec<&FeatureDriftResult> {
        let mut results: Vec<&FeatureDriftResult> = self.feature_results.values().collect();
        results.sort_by(|a, b| a.feature_name().cmp(b.feature_name()));
        results
    }

    /// See [`exceeds`].
    pub fn exceeds(&self, threshold: f64) -> bool {
        exceeds(self, threshold)
    }
}

/// Whether the drift share is strictly above `threshold`.
///
/// A share equal to the threshold does not exceed it. The threshold range is not
/// checked: a threshold of 1 or more is never exceeded, a negative one always is.
pub fn exceeds(report: &DriftReport, threshold: f64) -> bool {
    report.drift_share() > threshold
}

/// Entry of [`ReportDocument::feature_results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub ks_statistic: f64,
    pub p_value: f64,
    pub drifted: bool,
    pub reference_size: usize,
    pub current_size: usize,
}

/// Structured document of a [`DriftReport`].
///
/// Field order is fixed, features and drifted feature names are in lexicographic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub drift_detected: bool,
    pub drift_share: f64,
    pub drifted_features: Vec<String>,
    pub total_features: usize,
    pub feature_results: BTreeMap<String, FeatureEntry>,
    pub timestamp: DateTime<Utc>,
}

impl From<&DriftReport> for ReportDocument {
    fn from(report: &DriftReport) -> Self {
        let feature_results = report
            .feature_results
            .values()
            .map(|r| {
                (
                    r.feature_name.clone(),
                    FeatureEntry {
                        ks_statistic: r.statistic,
                        p_value: r.p_value,
                        drifted: r.drifted,
                        reference_size: r.reference_size,
                        current_size: r.current_size,
                    },
                )
            })
            .collect();
        ReportDocument {
            drift_detected: report.drift_detected,
            drift_share: report.drift_share,
            drifted_features: report.drifted_features.iter().cloned().collect(),
            total_features: report.total_features,
            feature_results,
            timestamp: report.timestamp,
        }
    }
}

impl From<DriftReport> for ReportDocument {
    fn from(report: DriftReport) -> Self {
        ReportDocument::from(&report)
    }
}

impl TryFrom<ReportDocument> for DriftReport {
    type Error = DriftError;

    /// Rebuild a report from its document, rejecting documents whose summary
    /// fields disagree with their feature results.
    fn try_from(doc: ReportDocument) -> Result<Self, Self::Error> {
        let results: Vec<FeatureDriftResult> = doc
            .feature_results
            .iter()
            .map(|(name, e)| FeatureDriftResult::new(name, e.ks_statistic, e.p_value, e.reference_size, e.current_size))
            .collect();
        for r in &results {
            if doc.feature_results[r.feature_name()].drifted != r.drifted() {
                return Err(DriftError::UnableToRead(format!(
                    "feature {} is marked drifted={} with p-value {}",
                    r.feature_name(),
                    !r.drifted(),
                    r.p_value()
                )));
            }
        }
        let report = DriftReport::from_results(results, doc.timestamp)?;
        let drifted: Vec<String> = report.drifted_features.iter().cloned().collect();
        if report.drift_detected != doc.drift_detected
            || report.total_features != doc.total_features
            || report.drift_share != doc.drift_share
            || drifted != doc.drifted_features
        {
            return Err(DriftError::UnableToRead("summary fields do not match the feature results".to_string()));
        }
        Ok(report)
    }
}
