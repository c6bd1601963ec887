//! Source and target abstractions every adapter implements.

use crate::record::{Columns, Record};

/// Something records can be read from, one at a time.
pub trait DataSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Columns every record of this source may carry, in display order.
    fn columns(&mut self) -> Result<Columns, Self::Error>;

    /// Next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>, Self::Error>;

    /// Rewind to the first record.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

/// Something that consumes every record of a [`DataSource`].
pub trait DataTarget {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write<S: DataSource>(&mut self, source: &mut S) -> Result<WriteSummary, Self::Error>;
}

/// Outcome of a [`DataTarget::write`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub records: usize,
    pub success: bool,
}

impl WriteSummary {
    pub fn succeeded(records: usize) -> Self {
        Self {
            records,
            success: true,
        }
    }
}

/// Read at most `limit` records from the start of `source`, leaving it rewound.
pub fn head<S: DataSource>(
    source: &mut S,
    limit: usize,
) -> Result<(Columns, Vec<Record>), S::Error> {
    source.reset()?;
    let columns = source.columns()?;
    let mut records = Vec::new();
    while records.len() < limit {
        match source.next_record()? {
            Some(record) => records.push(record),
            None => break,
        }
    }
    source.reset()?;
    Ok((columns, records))
}

/// In-memory source, mostly useful for tests and for re-reading buffered data.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    columns: Columns,
    records: Vec<Record>,
    position: usize,
}

impl MemorySource {
    pub fn new(columns: Columns, records: Vec<Record>) -> Self {
        Self {
            columns,
            records,
            position: 0,
        }
    }
}

impl DataSource for MemorySource {
    type Error = std::convert::Infallible;

    fn columns(&mut self) -> Result<Columns, Self::Error> {
        Ok(self.columns.clone())
    }

    fn next_record(&mut self) -> Result<Option<Record>, Self::Error> {
        let record = self.records.get(self.position).cloned();
        if record.is_some() {
            self.position += 1;
        }
        Ok(record)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.position = 0;
        Ok(())
    }
}
