//! Alert
//!
//! Drift alerts and the sinks delivering them. The engine only decides whether an
//! alert is due; callers hand the alert to an [`AlertSink`].
use crate::constants::ALERT_SUBJECT;
use crate::drift::report::{exceeds, DriftReport, ReportDocument};
use crate::errors::DriftError;
use crate::utils::fmt_percent;
use chrono::SecondsFormat;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Notification sent when the drift share exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftAlert {
    pub subject: String,
    /// Human readable body.
    pub message: String,
    pub drift_share: f64,
    pub threshold: f64,
    /// Structured document of the report.
    pub payload: serde_json::Value,
}

impl DriftAlert {
    /// Build the alert for `report` evaluated against `threshold`.
    pub fn from_report(report: &DriftReport, threshold: f64) -> Result<Self, DriftError> {
        let status = if exceeds(report, threshold) { "EXCEEDS THRESHOLD" } else { "WITHIN THRESHOLD" };
        let drifted: Vec<&str> = report.drifted_features().iter().map(|f| f.as_str()).collect();
        let drifted = if drifted.is_empty() { "none".to_string() } else { drifted.join(", ") };
        let message = format!(
            "Data Drift Alert - MLOps Pipeline\n\n\
             Drift Share: {}\n\
             Threshold: {}\n\
             Status: {}\n\n\
             Drift detected: {}\n\
             Drifted features: {}\n\
             Timestamp: {}\n\n\
             Please review the drift report and consider retraining the model.\n",
            fmt_percent(report.drift_share(), 2),
            fmt_percent(threshold, 2),
            status,
            report.drift_detected(),
            drifted,
            report.timestamp().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
        let payload = serde_json::to_value(ReportDocument::from(report))
            .map_err(|e| DriftError::UnableToWrite(e.to_string()))?;

        Ok(DriftAlert {
            subject: ALERT_SUBJECT.to_string(),
            message,
            drift_share: report.drift_share(),
            threshold,
            payload,
        })
    }
}

/// Delivery channel for drift alerts.
pub trait AlertSink {
    /// Deliver an alert.
    fn publish(&self, alert: &DriftAlert) -> Result<(), DriftError>;
}

/// Sink writing alerts to the log at warning level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn publish(&self, alert: &DriftAlert) -> Result<(), DriftError> {
        warn!("{}\n{}", alert.subject, alert.message);
        Ok(())
    }
}

/// Sink posting alerts as JSON to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookAlertSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookAlertSink {
    /// Create a webhook sink.
    ///
    /// * `url` - Endpoint receiving a `POST` with the alert as JSON body.
    /// * `timeout` - Request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DriftError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DriftError::AlertDelivery(e.to_string()))?;
        Ok(Self::with_client(url, client))
    }

    /// Create a webhook sink sending through an existing client.
    pub fn with_client(url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        WebhookAlertSink { url: url.into(), client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AlertSink for WebhookAlertSink {
    fn publish(&self, alert: &DriftAlert) -> Result<(), DriftError> {
        self.client
            .post(&self.url)
            .json(alert)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| DriftError::AlertDelivery(e.to_string()))?;
        info!("Alert sent to {}", self.url);
        Ok(())
    }
}
