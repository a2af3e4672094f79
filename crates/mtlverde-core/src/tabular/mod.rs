//! CSV readers for the tabular sources
//!
//! Every reader opens the file with a flexible `csv` reader, resolves the columns it needs
//! by header name and skips rows that cannot be used. A missing file or a missing column
//! is a [`LoadError`]; a bad row is only a warning.

use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};

pub mod air;
pub mod gardens;
pub mod trees;

pub use air::{read_air_readings, read_station_names};
pub use gardens::{garden_counts, read_gardens};
pub use trees::{read_trees, tree_counts, TreeRecord};

/// An open CSV file with its trimmed header row
pub(crate) struct CsvTable {
    path: PathBuf,
    headers: Vec<String>,
    reader: csv::Reader<File>,
}

impl CsvTable {
    pub(crate) fn open(path: &Path) -> LoadResult<Self> {
        if !path.exists() {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })?;

        let headers = reader
            .headers()
            .map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        Ok(Self { path: path.to_path_buf(), headers, reader })
    }

    /// Index of a required column
    pub(crate) fn column(&self, name: &str) -> LoadResult<usize> {
        self.optional_column(name).ok_or_else(|| LoadError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }

    pub(crate) fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Visit every well-formed row. Rows that fail to decode or carry more fields than
    /// the header are skipped; the number skipped is returned.
    pub(crate) fn for_each_row(&mut self, mut visit: impl FnMut(&StringRecord)) -> usize {
        let width = self.headers.len();
        let mut skipped = 0;
        let mut record = StringRecord::new();

        loop {
            match self.reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) if record.len() > width => {
                    skipped += 1;
                }
                Ok(true) => visit(&record),
                Err(e) => {
                    tracing::debug!("Skipping malformed row in {}: {}", self.path.display(), e);
                    skipped += 1;
                    // A decoding error leaves the reader positioned after the bad record
                    if e.is_io_error() {
                        break;
                    }
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed rows in {}", skipped, self.path.display());
        }
        skipped
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Trimmed field, `None` when absent or blank
pub(crate) fn field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).map(str::trim).filter(|s| !s.is_empty())
}

/// Numeric field; a decimal comma is accepted
pub(crate) fn number_field(record: &StringRecord, index: usize) -> Option<f64> {
    let raw = field(record, index)?;
    raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
