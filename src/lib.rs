// Modules
pub mod alert;
pub mod config;
pub mod constants;
pub mod data;
pub mod drift;
pub mod errors;
pub mod io;
pub mod monitor;
pub mod render;
pub mod utils;

// Individual classes, and functions
pub use config::MonitorConfig;
pub use data::{Column, Dataset};
pub use drift::{detect_drift, exceeds, DriftReport, FeatureDriftResult, KsMethod};
pub use errors::DriftError;
pub use monitor::{DriftMonitor, MonitorOutcome};
