//! Semicolon-delimited CSV files as a [`DataSource`].

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use sib_model::{Column, Columns, DataSource, Record};

use crate::error::{IngestError, Result};
use crate::DELIMITER;

/// Reads a CSV file with a header row.
///
/// Every column is text; empty cells are left out of the record.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    headers: Vec<String>,
    reader: csv::Reader<File>,
}

impl CsvSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_reader(&path)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| IngestError::Read {
                path: path.clone(),
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(IngestError::MissingHeader { path });
        }
        debug!(path = %path.display(), columns = headers.len(), "opened CSV source");
        Ok(Self {
            path,
            headers,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

impl DataSource for CsvSource {
    type Error = IngestError;

    fn columns(&mut self) -> Result<Columns> {
        Ok(self.headers.iter().map(Column::text).collect())
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        let mut row = csv::StringRecord::new();
        let more = self
            .reader
            .read_record(&mut row)
            .map_err(|source| IngestError::Read {
                path: self.path.clone(),
                source,
            })?;
        if !more {
            return Ok(None);
        }
        let record = self
            .headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(name, cell)| (name.as_str(), cell))
            .collect();
        Ok(Some(record))
    }

    fn reset(&mut self) -> Result<()> {
        self.reader = open_reader(&self.path)?;
        Ok(())
    }
}
