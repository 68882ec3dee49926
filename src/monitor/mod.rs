//! Monitor
//!
//! One drift monitoring run: compare the datasets, render the documents, check the
//! threshold, and, at the caller's request, archive the documents and dispatch an alert.
use crate::alert::{AlertSink, DriftAlert, LogAlertSink, WebhookAlertSink};
use crate::config::MonitorConfig;
use crate::constants::ALERT_TIMEOUT;
use crate::data::Dataset;
use crate::drift::calculation::calculate_drift;
use crate::drift::report::{exceeds, DriftReport};
use crate::drift::selection::select_features;
use crate::errors::DriftError;
use crate::io::ReportArchive;
use crate::render::{render_summary, ReportDocuments};
use chrono::{DateTime, Utc};
use log::{info, warn};


/// Result of a monitoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOutcome {
    pub report: DriftReport,
    pub documents: ReportDocuments,
    /// Threshold the report was evaluated against.
    pub threshold: f64,
    /// Whether the drift share is strictly above the threshold.
    pub exceeds: bool,
}

impl MonitorOutcome {
    /// Process exit code, `1` when the threshold is exceeded, `0` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.exceeds { 1 } else { 0 }
    }

    pub fn summary(&self) -> String {
        render_summary(&self.report, self.threshold)
    }
}

/// Drift monitor driven by a [`MonitorConfig`].
#[derive(Debug, Clone)]
pub struct DriftMonitor {
    cfg: MonitorConfig,
}

impl DriftMonitor {
    /// Create a monitor, failing on an invalid configuration.
    pub fn new(cfg: MonitorConfig) -> Result<Self, DriftError> {
        cfg.validate()?;
        Ok(DriftMonitor { cfg })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.cfg
    }

    /// Compare `current` with `reference` now.
    pub fn run(&self, reference: &Dataset, current: &Dataset) -> Result<MonitorOutcome, DriftError> {
        self.run_at(reference, current, Utc::now())
    }

    /// Compare `current` with `reference`, stamping the report with `timestamp`.
    pub fn run_at(
        &self,
        reference: &Dataset,
        current: &Dataset,
        timestamp: DateTime<Utc>,
    ) -> Result<MonitorOutcome, DriftError> {
        let features = select_features(reference, current, &self.cfg.target_columns);
        info!(
            "Comparing {} of {} reference columns with {} current columns",
            features.len(),
            reference.cols(),
            current.cols()
        );

        let results = match (self.cfg.parallel, self.cfg.num_threads) {
            (true, Some(num_threads)) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| {
                        DriftError::InvalidParameter(
                            "num_threads".to_string(),
                            "a buildable thread pool".to_string(),
                            e.to_string(),
                        )
                    })?;
                pool.install(|| calculate_drift(reference, current, &features, self.cfg.ks_method, true))
            }
            (parallel, _) => calculate_drift(reference, current, &features, self.cfg.ks_method, parallel),
        };

        let report = DriftReport::from_results(results, timestamp)?;
        let skipped = features.len() - report.total_features();
        if skipped > 0 {
            warn!("Skipped {} features without eligible values on both sides.", skipped);
        }
        if report.total_features() == 0 {
            warn!("No comparable features, drift share is reported as 0.");
        }

        let documents = ReportDocuments::render(&report)?;
        let exceeds = exceeds(&report, self.cfg.threshold);
        info!(
            "Drift share {:.4} over {} features, threshold {}, exceeds: {}",
            report.drift_share(),
            report.total_features(),
            self.cfg.threshold,
            exceeds
        );

        Ok(MonitorOutcome {
            report,
            documents,
            threshold: self.cfg.threshold,
            exceeds,
        })
    }

    /// Publish an alert for `outcome` when it exceeds the threshold.
    ///
    /// Returns whether an alert was published.
    pub fn dispatch_alert(&self, outcome: &MonitorOutcome, sink: &dyn AlertSink) -> Result<bool, DriftError> {
        if !outcome.exceeds {
            return Ok(false);
        }
        let alert = DriftAlert::from_report(&outcome.report, outcome.threshold)?;
        sink.publish(&alert)?;
        Ok(true)
    }

    /// Sink selected by the configuration: the webhook when set, the log otherwise.
    pub fn alert_sink(&self) -> Result<Box<dyn AlertSink>, DriftError> {
        match &self.cfg.alert_webhook {
            Some(url) => Ok(Box::new(WebhookAlertSink::new(url.clone(), ALERT_TIMEOUT)?)),
            None => Ok(Box::new(LogAlertSink)),
        }
    }

    /// Store copies of both documents under the configured prefix.
    pub fn archive(&self, outcome: &MonitorOutcome, archive: &dyn ReportArchive) -> Result<Vec<String>, DriftError> {
        archive.archive(&self.cfg.archive_prefix, &outcome.documents, outcome.report.timestamp())
    }
}
