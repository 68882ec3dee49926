//! Errors
//!
//! Custom error types used throughout the `perpetual-drift` crate.
use thiserror::Error;

/// Errors that can occur while loading data, comparing distributions or reporting drift.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Columns of a dataset have different lengths.
    #[error("Column {0} has {1} rows, but the dataset has {2} rows.")]
    RaggedColumn(String, usize, usize),
    /// The same column name appears twice in a dataset.
    #[error("Column name {0} appears more than once in the dataset.")]
    DuplicateColumn(String),
    /// A requested column is not part of the dataset.
    #[error("Column {0} was not found in the dataset.")]
    UnknownColumn(String),
    /// The same feature was reported twice when aggregating results.
    #[error("Feature {0} has more than one drift result.")]
    DuplicateFeature(String),
    /// A feature result carries a statistic or p-value outside of [0, 1].
    #[error("Feature {0} has an invalid drift result: {1}.")]
    InvalidResult(String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to read a dataset.
    #[error("Unable to read dataset {0}: {1}")]
    UnableToReadData(String, String),
    /// Unable to read configuration.
    #[error("Unable to read configuration: {0}")]
    UnableToReadConfig(String),
    /// Unable to write or serialize a report.
    #[error("Unable to write report: {0}")]
    UnableToWrite(String),
    /// Unable to deserialize a report document.
    #[error("Unable to read report: {0}")]
    UnableToRead(String),
    /// Alert could not be delivered.
    #[error("Unable to deliver alert: {0}")]
    AlertDelivery(String),
}
