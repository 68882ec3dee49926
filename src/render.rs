//! Render
//!
//! Turns a [`DriftReport`] into documents: a structured JSON document for programs,
//! an HTML page for people, and a short plain text summary for the console.
//! All renderers list features in lexicographic order, so identical reports always
//! give byte-identical output.
use crate::drift::report::{exceeds, DriftReport, ReportDocument};
use crate::errors::DriftError;
use crate::utils::{escape_html, fmt_percent, items_to_strings};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Output document formats.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
}

impl ReportFormat {
    /// File extension used when storing a document of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Json" | "json" => Ok(ReportFormat::Json),
            "Html" | "html" => Ok(ReportFormat::Html),
            _ => Err(DriftError::ParseString(
                s.to_string(),
                "ReportFormat".to_string(),
                items_to_strings(vec!["Json", "Html"]),
            )),
        }
    }
}

/// Both persisted documents of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocuments {
    /// Structured document.
    pub json: String,
    /// Narrative document.
    pub html: String,
}

impl ReportDocuments {
    pub fn render(report: &DriftReport) -> Result<Self, DriftError> {
        Ok(ReportDocuments {
            json: render_json(report)?,
            html: render_html(report),
        })
    }

    pub fn get(&self, format: ReportFormat) -> &str {
        match format {
            ReportFormat::Json => &self.json,
            ReportFormat::Html => &self.html,
        }
    }
}

/// Structured document, pretty printed JSON.
pub fn render_json(report: &DriftReport) -> Result<String, DriftError> {
    serde_json::to_string_pretty(&ReportDocument::from(report)).map_err(|e| DriftError::UnableToWrite(e.to_string()))
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Drift Detection Report</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; }
        .summary { background: #f0f0f0; padding: 15px; border-radius: 5px; }
        .drift { color: red; }
        .no-drift { color: green; }
        table { border-collapse: collapse; width: 100%; margin-top: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #4CAF50; color: white; }
        tr:nth-child(even) { background-color: #f2f2f2; }
    </style>
</head>
<body>
    <h1>Data Drift Detection Report</h1>
"#;

const HTML_TAIL: &str = r#"    <h2>Interpretation</h2>
    <p>
    This report uses the <strong>Kolmogorov-Smirnov test</strong> to compare distributions
    between reference (training) data and current (production) data.
    </p>
    <ul>
        <li>P-value &lt; 0.05 indicates significant drift</li>
        <li>KS statistic closer to 1 indicates larger distribution difference</li>
    </ul>
</body>
</html>
"#;

/// Narrative document, a self contained HTML page.
pub fn render_html(report: &DriftReport) -> String {
    let (verdict_class, verdict) = if report.drift_detected() {
        ("drift", "YES - Action Required")
    } else {
        ("no-drift", "NO - All Good")
    };

    let mut html = String::from(HTML_HEAD);
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"
    <div class="summary">
        <h2>Summary</h2>
        <p><strong>Drift Detected:</strong> <span class="{}">{}</span></p>
        <p><strong>Drift Share:</strong> {} ({} / {} features)</p>
        <p><strong>Timestamp:</strong> {}</p>
    </div>

    <h2>Feature-Level Results</h2>
    <table>
        <tr>
            <th>Feature</th>
            <th>KS Statistic</th>
            <th>P-Value</th>
            <th>Drift Status</th>
        </tr>
"#,
        verdict_class,
        verdict,
        fmt_percent(report.drift_share(), 1),
        report.drifted_features().len(),
        report.total_features(),
        report.timestamp().to_rfc3339_opts(SecondsFormat::AutoSi, true),
    );

    for r in report.sorted_results() {
        let (class, status) = if r.drifted() { ("drift", "DRIFT") } else { ("no-drift", "OK") };
        let _ = write!(
            html,
            r#"        <tr>
            <td>{}</td>
            <td>{:.4}</td>
            <td>{:.4}</td>
            <td class="{}"><strong>{}</strong></td>
        </tr>
"#,
            escape_html(r.feature_name()),
            r.statistic(),
            r.p_value(),
            class,
            status,
        );
    }

    html.push_str("    </table>\n\n");
    html.push_str(HTML_TAIL);
    html
}

/// Console summary of a report evaluated against `threshold`.
pub fn render_summary(report: &DriftReport, threshold: f64) -> String {
    let mut s = String::new();
    s.push_str("Drift Detection Results:\n");
    s.push_str(&format!("  Drift detected: {}\n", report.drift_detected()));
    s.push_str(&format!("  Drift share: {}\n", fmt_percent(report.drift_share(), 2)));
    s.push_str(&format!("  Threshold: {}\n", fmt_percent(threshold, 2)));
    s.push_str(&format!("  Exceeds threshold: {}\n", exceeds(report, threshold)));
    s.push_str(&format!("  Features compared: {}\n", report.total_features()));
    if !report.drifted_features().is_empty() {
        let names: Vec<&str> = report.drifted_features().iter().map(|n| n.as_str()).collect();
        s.push_str(&format!("\n  Drifted features: {}\n", names.join(", ")));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::report::FeatureDriftResult;
    use chrono::{TimeZone, Utc};

    fn report(order: &[&str]) -> DriftReport {
        let results = order.iter().map(|&name| {
            let p = if name.starts_with('d') { 0.001 } else { 0.9 };
            FeatureDriftResult::new(name, 0.25, p, 100, 120)
        });
        DriftReport::from_results(results, Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_json_fields_and_order() {
        let json = render_json(&report(&["zeta", "drift_b", "alpha", "drift_a"])).unwrap();
        let keys = [
            "\"drift_detected\"",
            "\"drift_share\"",
            "\"drifted_features\"",
            "\"total_features\"",
            "\"feature_results\"",
            "\"timestamp\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let features = ["\"alpha\":", "\"drift_a\":", "\"drift_b\":", "\"zeta\":"];
        let positions: Vec<usize> = features.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["drift_detected"], true);
        assert_eq!(value["drift_share"], 0.5);
        assert_eq!(value["total_features"], 4);
        assert_eq!(value["drifted_features"], serde_json::json!(["drift_a", "drift_b"]));
        assert_eq!(value["feature_results"]["alpha"]["ks_statistic"], 0.25);
        assert_eq!(value["feature_results"]["alpha"]["p_value"], 0.9);
        assert_eq!(value["feature_results"]["alpha"]["drifted"], false);
        assert_eq!(value["feature_results"]["alpha"]["current_size"], 120);
        assert_eq!(value["timestamp"], "2024-05-17T09:30:00Z");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = report(&["b", "drift_x", "a", "c"]);
        let b = report(&["c", "a", "drift_x", "b"]);
        assert_eq!(ReportDocuments::render(&a).unwrap(), ReportDocuments::render(&a).unwrap());
        assert_eq!(ReportDocuments::render(&a).unwrap(), ReportDocuments::render(&b).unwrap());
    }

    #[test]
    fn test_html_content() {
        let html = render_html(&report(&["zeta", "drift_a", "alpha"]));
        assert!(html.contains("YES - Action Required"));
        assert!(html.contains("33.3% (1 / 3 features)"));
        assert!(html.contains("<td class=\"drift\"><strong>DRIFT</strong></td>"));
        assert!(html.contains("<td class=\"no-drift\"><strong>OK</strong></td>"));
        assert!(html.contains("<td>0.2500</td>"));
        let a = html.find("<td>alpha</td>").unwrap();
        let d = html.find("<td>drift_a</td>").unwrap();
        let z = html.find("<td>zeta</td>").unwrap();
        assert!(a < d && d < z);
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_documents_share_timestamp() {
        let docs = ReportDocuments::render(&report(&["a"])).unwrap();
        assert!(docs.html.contains("<p><strong>Timestamp:</strong> 2024-05-17T09:30:00Z</p>"));
        assert!(docs.json.contains("\"timestamp\": \"2024-05-17T09:30:00Z\""));
    }

    #[test]
    fn test_html_no_drift_and_escaping() {
        let html = render_html(&report(&["<script>"]));
        assert!(html.contains("NO - All Good"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<td><script></td>"));
    }

    #[test]
    fn test_html_empty_report() {
        let html = render_html(&report(&[]));
        assert!(html.contains("0.0% (0 / 0 features)"));
        assert!(html.contains("NO - All Good"));
    }

    #[test]
    fn test_summary() {
        let s = render_summary(&report(&["a", "drift_a", "drift_b"]), 0.3);
        assert!(s.contains("Drift share: 66.67%"));
        assert!(s.contains("Threshold: 30.00%"));
        assert!(s.contains("Exceeds threshold: true"));
        assert!(s.contains("Drifted features: drift_a, drift_b"));

        let s = render_summary(&report(&["a"]), 0.3);
        assert!(s.contains("Exceeds threshold: false"));
        assert!(!s.contains("Drifted features"));
    }

    #[test]
    fn test_report_format() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("Html".parse::<ReportFormat>().unwrap().extension(), "html");
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert!("text".parse::<ReportFormat>().is_err());
        let docs = ReportDocuments::render(&report(&["a"])).unwrap();
        assert!(docs.get(ReportFormat::Json).starts_with('{'));
        assert!(docs.get(ReportFormat::Html).starts_with("<!DOCTYPE html>"));
    }
}
