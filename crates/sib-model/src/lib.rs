//! Canonical record model shared by every SIB data source and target.
//!
//! Adapters (CSV files, the publicWFS) translate their native rows into
//! [`Record`]s of typed [`Value`]s and describe themselves with [`Columns`].
//! [`Transformed`] layers renames, removals, constants and network-node
//! splitting over any [`DataSource`].

pub mod error;
pub mod record;
pub mod source;
pub mod transform;
pub mod value;

pub use error::{ModelError, Result};
pub use record::{Column, Columns, Record};
pub use source::{DataSource, DataTarget, MemorySource, WriteSummary, head};
pub use transform::{NetworkNode, RecordTransform, Transformed};
pub use value::{ColumnType, DATE_FORMAT, DATETIME_FORMAT, Value};
