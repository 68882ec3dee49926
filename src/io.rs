//! IO
//!
//! Thin adapters between the file system and the drift engine: reading CSV files into
//! [`Dataset`]s, writing rendered reports, and archiving them under timestamped keys.
use crate::data::{Column, Dataset};
use crate::errors::DriftError;
use crate::render::{ReportDocuments, ReportFormat};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Read a CSV file with a header row into a dataset.
///
/// * `path` - Path of the CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, DriftError> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| DriftError::UnableToReadData(source.clone(), e.to_string()))?;
    let dataset = read_csv_from(BufReader::new(file), &source)?;
    info!("Loaded {} rows and {} columns from {}", dataset.rows(), dataset.cols(), source);
    Ok(dataset)
}

/// Read CSV data with a header row from any reader.
///
/// * `reader` - CSV input.
/// * `source` - Name of the input, used in error messages.
pub fn read_csv_from<R: Read>(reader: R, source: &str) -> Result<Dataset, DriftError> {
    let to_err = |e: csv::Error| DriftError::UnableToReadData(source.to_string(), e.to_string());
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers().map_err(to_err)?.clone();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in csv_reader.records() {
        let record = result.map_err(to_err)?;
        for (col, cell) in cells.iter_mut().zip(record.iter()) {
            col.push(cell.to_string());
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, col)| Column::from_cells(name, col))
        .collect();
    for c in &columns {
        debug!("{}: column {} is {}", source, c.name(), c.kind());
    }
    Dataset::new(columns)
}

/// Write the structured and narrative documents to their paths.
pub fn write_reports<P: AsRef<Path>, Q: AsRef<Path>>(
    documents: &ReportDocuments,
    json_path: P,
    html_path: Q,
) -> Result<(), DriftError> {
    write_document(json_path.as_ref(), &documents.json)?;
    write_document(html_path.as_ref(), &documents.html)?;
    Ok(())
}

fn write_document(path: &Path, contents: &str) -> Result<(), DriftError> {
    fs::write(path, contents).map_err(|e| DriftError::UnableToWrite(format!("{}: {}", path.display(), e)))?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Storage key of an archived document, `{prefix}drift_{kind}_{%Y%m%d_%H%M%S}.{ext}`.
pub fn archive_key(prefix: &str, format: ReportFormat, timestamp: DateTime<Utc>) -> String {
    let kind = match format {
        ReportFormat::Json => "results",
        ReportFormat::Html => "report",
    };
    format!(
        "{}drift_{}_{}.{}",
        prefix,
        kind,
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Keyed store holding archived reports and the data extracts they were computed from.
pub trait ReportArchive {
    /// Store `contents` under `key`.
    fn put(&self, key: &str, contents: &str) -> Result<(), DriftError>;

    /// Fetch the contents stored under `key`.
    fn get(&self, key: &str) -> Result<String, DriftError>;

    /// Store both documents of a report, returning the keys used.
    fn archive(
        &self,
        prefix: &str,
        documents: &ReportDocuments,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<String>, DriftError> {
        let mut keys = Vec::with_capacity(2);
        for format in [ReportFormat::Html, ReportFormat::Json] {
            let key = archive_key(prefix, format, timestamp);
            self.put(&key, documents.get(format))?;
            keys.push(key);
        }
        Ok(keys)
    }
}

/// Archive backed by a local directory, keys map to relative paths.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    root: PathBuf,
}

impl LocalArchive {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        LocalArchive { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportArchive for LocalArchive {
    fn put(&self, key: &str, contents: &str) -> Result<(), DriftError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DriftError::UnableToWrite(format!("{}: {}", parent.display(), e)))?;
        }
        write_document(&path, contents)
    }

    fn get(&self, key: &str) -> Result<String, DriftError> {
        let path = self.root.join(key);
        fs::read_to_string(&path).map_err(|e| DriftError::UnableToReadData(path.display().to_string(), e.to_string()))
    }
}

/// Read a CSV extract stored in an archive under `key`.
pub fn read_archived_csv(archive: &dyn ReportArchive, key: &str) -> Result<Dataset, DriftError> {
    let contents = archive.get(key)?;
    let dataset = read_csv_from(contents.as_bytes(), key)?;
    info!("Fetched {} rows and {} columns from {}", dataset.rows(), dataset.cols(), key);
    Ok(dataset)
}
