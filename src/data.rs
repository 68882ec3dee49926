//! Data
//!
//! Immutable, column oriented tabular data. Every column carries a [`ColumnKind`]
//! decided once when the column is built, so that downstream code never has to
//! inspect values to find out whether a column can be compared numerically.
use crate::constants::MISSING_TOKENS;
use crate::errors::DriftError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of values held by a column.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Real valued column, missing cells are stored as `NaN`.
    Numeric,
    /// Anything else: text, categories, identifiers, booleans.
    NonNumeric,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::NonNumeric => write!(f, "non-numeric"),
        }
    }
}

/// Values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Numeric values, `NaN` marks a missing cell.
    Numeric(Vec<f64>),
    /// Raw cells, `None` marks a missing cell.
    NonNumeric(Vec<Option<String>>),
}

/// A named column of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

/// Check if a raw cell should be treated as a missing value.
#[inline]
pub fn is_missing_token(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_TOKENS.contains(&cell)
}

impl Column {
    /// Create a numeric column.
    ///
    /// * `name` - Name of the column.
    /// * `values` - Values of the column, use `f64::NAN` for missing cells.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    /// Create a non-numeric column.
    ///
    /// * `name` - Name of the column.
    /// * `values` - Cells of the column, `None` for missing cells.
    pub fn non_numeric(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            values: ColumnValues::NonNumeric(values),
        }
    }

    /// Build a column from raw text cells, inferring its kind in a single pass.
    ///
    /// The column is numeric when every non-missing cell parses as a float.
    /// A column with only missing cells is numeric as well.
    pub fn from_cells<I, S>(name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<Option<String>> = cells
            .into_iter()
            .map(|c| {
                let c = c.as_ref();
                if is_missing_token(c) { None } else { Some(c.to_string()) }
            })
            .collect();

        let parsed: Option<Vec<f64>> = cells
            .iter()
            .map(|c| match c {
                None => Some(f64::NAN),
                Some(v) => v.trim().parse::<f64>().ok(),
            })
            .collect();

        match parsed {
            Some(values) => Column::numeric(name, values),
            None => Column::non_numeric(name, cells),
        }
    }

    /// Name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the column.
    pub fn kind(&self) -> ColumnKind {
        match self.values {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::NonNumeric(_) => ColumnKind::NonNumeric,
        }
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Numeric values of the column, `None` for a non-numeric column.
    pub fn numeric_values(&self) -> Option<&[f64]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::NonNumeric(_) => None,
        }
    }

    /// Number of cells in the column.
    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::NonNumeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells in the column.
    pub fn n_missing(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnValues::NonNumeric(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

/// Rectangular table of uniquely named columns.
///
/// A `Dataset` is never mutated once built, drift detection only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Create a new dataset.
    ///
    /// Fails if two columns share a name, or if the columns have different lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, DriftError> {
        let rows = columns.first().map_or(0, |c| c.len());
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(DriftError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != rows {
                return Err(DriftError::RaggedColumn(col.name().to_string(), col.len(), rows));
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// Create a numeric dataset from a contiguous column major buffer.
    ///
    /// * `names` - Column names, one per column.
    /// * `data` - Values, column after column.
    /// * `rows` - Number of rows.
    pub fn from_column_major<S: AsRef<str>>(names: &[S], data: &[f64], rows: usize) -> Result<Self, DriftError> {
        let expected = rows.checked_mul(names.len()).ok_or_else(|| {
            DriftError::InvalidParameter(
                "rows".to_string(),
                format!("at most {} rows for {} columns", usize::MAX / names.len().max(1), names.len()),
                rows.to_string(),
            )
        })?;
        if data.len() != expected {
            return Err(DriftError::InvalidParameter(
                "data".to_string(),
                format!("{} values", expected),
                data.len().to_string(),
            ));
        }
        let columns = names
            .iter()
            .enumerate()
            .map(|(j, name)| Column::numeric(name.as_ref(), data[j * rows..(j + 1) * rows].to_vec()))
            .collect();
        Dataset::new(columns)
    }

    /// Number of rows in the dataset.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the dataset.
    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of the columns, in dataset order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get a column by name, failing if it is not present.
    pub fn get_column(&self, name: &str) -> Result<&Column, DriftError> {
        self.column(name).ok_or_else(|| DriftError::UnknownColumn(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Kind of a column, `None` if the column does not exist.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind())
    }
}
