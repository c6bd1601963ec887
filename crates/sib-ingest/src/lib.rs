//! CSV files as SIB record sources and targets.
//!
//! Files use `;` as delimiter and start with a header row, the layout the
//! SIB import and export spreadsheets use.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IngestError, Result};
pub use reader::CsvSource;
pub use writer::{CsvTarget, format_value};

/// Field delimiter of every CSV file.
pub const DELIMITER: u8 = b';';
