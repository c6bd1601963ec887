//! Semicolon-delimited CSV files as a [`DataTarget`].

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use sib_model::{Columns, DataSource, DataTarget, Record, Value, WriteSummary};

use crate::DELIMITER;
use crate::error::{IngestError, Result};

/// Writes records to a CSV file, replacing its contents.
///
/// Column names and text are quoted; numbers are written unquoted with a
/// decimal comma; absent values stay empty.
#[derive(Debug, Clone)]
pub struct CsvTarget {
    path: PathBuf,
}

impl CsvTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_row(&self, writer: &mut csv::Writer<File>, row: &[String]) -> Result<()> {
        writer
            .write_record(row)
            .map_err(|source| IngestError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

impl DataTarget for CsvTarget {
    type Error = IngestError;

    fn write<S: DataSource>(&mut self, source: &mut S) -> Result<WriteSummary> {
        let columns = source.columns().map_err(boxed)?;

        // Quoting is decided per value, so the writer itself never quotes.
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(csv::QuoteStyle::Never)
            .from_path(&self.path)
            .map_err(|source| IngestError::Open {
                path: self.path.clone(),
                source,
            })?;

        let header: Vec<String> = columns.names().map(quote).collect();
        self.write_row(&mut writer, &header)?;

        let mut records = 0;
        while let Some(record) = source.next_record().map_err(boxed)? {
            self.write_row(&mut writer, &cells(&columns, &record))?;
            records += 1;
        }

        writer.flush().map_err(|source| IngestError::Flush {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), records, "CSV written");
        Ok(WriteSummary::succeeded(records))
    }
}

fn cells(columns: &Columns, record: &Record) -> Vec<String> {
    columns
        .names()
        .map(|name| record.get(name).map(format_value).unwrap_or_default())
        .collect()
}

/// Cell text of `value`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Integer(number) => number.to_string(),
        Value::Float(number) => number.to_string().replace('.', ","),
        other => quote(&other.to_string()),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn boxed<E>(err: E) -> IngestError
where
    E: std::error::Error + Send + Sync + 'static,
{
    IngestError::Source(Box::new(err))
}
