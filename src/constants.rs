/// Per-feature significance level: a feature drifts when its p-value is strictly below this.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
/// Default tolerated share of drifted features before an alert is raised.
pub const DEFAULT_DRIFT_THRESHOLD: f64 = 0.3;
/// Largest sample size for which `KsMethod::Auto` computes the exact KS distribution.
pub const EXACT_KS_MAX_SIZE: usize = 10_000;
/// Label columns excluded from drift testing unless configured otherwise.
pub const DEFAULT_TARGET_COLUMNS: [&str; 2] = ["Churn", "target"];
/// Cells parsed as missing values when reading tabular data.
pub const MISSING_TOKENS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];
pub const DEFAULT_ARCHIVE_PREFIX: &str = "monitoring/drift/";
pub const ALERT_SUBJECT: &str = "MLOps: Data Drift Detected";
pub const ALERT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
