//! Typed cell values and column types.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ModelError, Result};

/// Format used for date-time values on the wire and in CSV files.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used for date values on the wire and in CSV files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    #[default]
    Text,
    Integer,
    Float,
    /// Calendar date, optionally with a time of day.
    DateTime,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::DateTime => "datetime",
        }
    }

    /// Whether values of this type are written without quotes in text formats.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Parse a raw text value into this type.
    ///
    /// Date-time columns accept both `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS`.
    pub fn parse(self, raw: &str) -> Result<Value> {
        let invalid = || ModelError::InvalidValue {
            ty: self,
            value: raw.to_string(),
        };
        let trimmed = raw.trim();
        match self {
            ColumnType::Text => Ok(Value::Text(raw.to_string())),
            ColumnType::Integer => trimmed.parse().map(Value::Integer).map_err(|_| invalid()),
            ColumnType::Float => trimmed
                .replace(',', ".")
                .parse()
                .map(Value::Float)
                .map_err(|_| invalid()),
            ColumnType::DateTime if trimmed.len() > 10 => {
                NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
                    .map(Value::DateTime)
                    .map_err(|_| invalid())
            }
            ColumnType::DateTime => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Text(_) => ColumnType::Text,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Date(_) | Value::DateTime(_) => ColumnType::DateTime,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            Value::DateTime(value) => write!(f, "{}", value.format(DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}
