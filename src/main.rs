//! perpetual-drift - command line entry point
//!
//! Compares a current CSV extract with a reference one, writes the JSON and HTML
//! reports and exits with 1 when the drift share exceeds the threshold.
use clap::Parser;
use log::{error, info};
use perpetual_drift::io::{read_csv, write_reports, LocalArchive};
use perpetual_drift::{DriftError, DriftMonitor, MonitorConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "perpetual-drift", version, about = "Detect data drift between a reference and a current dataset")]
struct Cli {
    /// Reference (training) dataset.
    #[arg(long)]
    reference_csv: PathBuf,

    /// Current (production) dataset.
    #[arg(long)]
    current_csv: PathBuf,

    #[arg(long, default_value = "drift_report.html")]
    output_html: PathBuf,

    #[arg(long, default_value = "drift_results.json")]
    output_json: PathBuf,

    /// Tolerated share of drifted features.
    #[arg(long)]
    threshold: Option<f64>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label column to leave out, can be repeated.
    #[arg(long = "target-column")]
    target_columns: Vec<String>,

    /// Directory receiving timestamped copies of both reports.
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Send an alert when the threshold is exceeded.
    #[arg(long)]
    alert: bool,

    /// Test features one after another.
    #[arg(long)]
    sequential: bool,
}

fn build_config(cli: &Cli) -> Result<MonitorConfig, DriftError> {
    let mut cfg = match &cli.config {
        Some(path) => MonitorConfig::load_config(path)?,
        None => MonitorConfig::default(),
    };
    cfg = cfg.apply_env()?;
    if let Some(threshold) = cli.threshold {
        cfg = cfg.set_threshold(threshold);
    }
    if !cli.target_columns.is_empty() {
        cfg = cfg.set_target_columns(cli.target_columns.clone());
    }
    if cli.sequential {
        cfg = cfg.set_parallel(false);
    }
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<i32, DriftError> {
    let monitor = DriftMonitor::new(build_config(cli)?)?;

    let reference = read_csv(&cli.reference_csv)?;
    let current = read_csv(&cli.current_csv)?;
    let outcome = monitor.run(&reference, &current)?;

    write_reports(&outcome.documents, &cli.output_json, &cli.output_html)?;
    println!("{}", outcome.summary());

    if let Some(dir) = &cli.archive_dir {
        let keys = monitor.archive(&outcome, &LocalArchive::new(dir))?;
        info!("Archived {} documents under {}", keys.len(), dir.display());
    }
    if cli.alert && monitor.dispatch_alert(&outcome, monitor.alert_sink()?.as_ref())? {
        info!("Drift alert dispatched.");
    }

    Ok(outcome.exit_code())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    }
}
