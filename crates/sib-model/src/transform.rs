//! Column-level rewrites applied on top of any [`DataSource`].

use tracing::trace;

use crate::error::{ModelError, Result};
use crate::record::{Column, Columns, Record};
use crate::source::DataSource;
use crate::value::{ColumnType, Value};

/// Default suffix of a network node written without one.
const DEFAULT_NODE_SUFFIX: &str = "O";

/// A network node such as `123405678Z`: map sheet, running number, suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkNode {
    pub sheet: i64,
    pub number: i64,
    pub suffix: String,
}

impl NetworkNode {
    /// Split `TTTTNNNNN[S]`: four digits of map sheet, five digits of running number,
    /// an optional one-character suffix.
    pub fn parse(node: &str) -> Result<Self> {
        let invalid = |message: &str| ModelError::InvalidNetworkNode {
            node: node.to_string(),
            message: message.to_string(),
        };
        let node = node.trim();
        let chars: Vec<char> = node.chars().collect();
        if chars.len() < 9 {
            return Err(invalid("expected at least nine characters"));
        }
        if !chars[..9].iter().all(char::is_ascii_digit) {
            return Err(invalid("the first nine characters must be digits"));
        }
        let digits: String = chars[..9].iter().collect();
        let sheet = digits[..4].parse().map_err(|_| invalid("bad map sheet"))?;
        let number = digits[4..].parse().map_err(|_| invalid("bad running number"))?;
        let suffix = chars
            .get(9)
            .map_or_else(|| DEFAULT_NODE_SUFFIX.to_string(), char::to_string);
        Ok(Self {
            sheet,
            number,
            suffix,
        })
    }
}

/// Which end of a section a node column describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeEnd {
    From,
    To,
}

impl NodeEnd {
    fn columns(self) -> [&'static str; 3] {
        match self {
            NodeEnd::From => ["vtkNummer", "vnkLfd", "vzusatz"],
            NodeEnd::To => ["ntkNummer", "nnkLfd", "nzusatz"],
        }
    }
}

/// Rename, drop, add and split columns of every record passing through.
///
/// Steps run in a fixed order: renames, removals, added constants, node splits.
#[derive(Debug, Clone, Default)]
pub struct RecordTransform {
    rename: Vec<(String, String)>,
    remove: Vec<String>,
    add: Vec<(String, Value)>,
    from_node: Option<String>,
    to_node: Option<String>,
}

impl RecordTransform {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.push((from.into(), to.into()));
        self
    }

    #[must_use]
    pub fn remove(mut self, column: impl Into<String>) -> Self {
        self.remove.push(column.into());
        self
    }

    #[must_use]
    pub fn add(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add.push((column.into(), value.into()));
        self
    }

    /// Split the given columns into map sheet, running number and suffix columns.
    #[must_use]
    pub fn split_nodes(mut self, from_node: Option<String>, to_node: Option<String>) -> Self {
        self.from_node = from_node;
        self.to_node = to_node;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.rename.is_empty()
            && self.remove.is_empty()
            && self.add.is_empty()
            && self.from_node.is_none()
            && self.to_node.is_none()
    }

    pub fn apply_columns(&self, mut columns: Columns) -> Columns {
        for (from, to) in &self.rename {
            columns.rename(from, to);
        }
        for column in &self.remove {
            columns.remove(column);
        }
        for (name, value) in &self.add {
            columns.insert(Column::new(name.clone(), value.column_type()));
        }
        for (node, end) in self.node_columns() {
            if columns.remove(node).is_some() {
                let [sheet, number, suffix] = end.columns();
                columns.insert(Column::new(sheet, ColumnType::Integer));
                columns.insert(Column::new(number, ColumnType::Integer));
                columns.insert(Column::new(suffix, ColumnType::Text));
            }
        }
        columns
    }

    pub fn apply_record(&self, mut record: Record) -> Result<Record> {
        for (from, to) in &self.rename {
            if let Some(value) = record.remove(from) {
                record.insert(to.clone(), value);
            }
        }
        for column in &self.remove {
            record.remove(column);
        }
        for (name, value) in &self.add {
            record.insert(name.clone(), value.clone());
        }
        for (node, end) in self.node_columns() {
            if let Some(value) = record.remove(node) {
                let parsed = NetworkNode::parse(&value.to_string())?;
                trace!(node = %value, sheet = parsed.sheet, number = parsed.number, "split network node");
                let [sheet, number, suffix] = end.columns();
                record.insert(sheet, parsed.sheet);
                record.insert(number, parsed.number);
                record.insert(suffix, parsed.suffix);
            }
        }
        Ok(record)
    }

    fn node_columns(&self) -> impl Iterator<Item = (&str, NodeEnd)> {
        self.from_node
            .as_deref()
            .map(|c| (c, NodeEnd::From))
            .into_iter()
            .chain(self.to_node.as_deref().map(|c| (c, NodeEnd::To)))
    }
}

/// A [`DataSource`] whose columns and records pass through a [`RecordTransform`].
#[derive(Debug)]
pub struct Transformed<S> {
    inner: S,
    transform: RecordTransform,
}

impl<S: DataSource> Transformed<S> {
    pub fn new(inner: S, transform: RecordTransform) -> Self {
        Self { inner, transform }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DataSource> DataSource for Transformed<S> {
    type Error = ModelError;

    fn columns(&mut self) -> Result<Columns> {
        let columns = self.inner.columns().map_err(ModelError::wrap_source)?;
        Ok(self.transform.apply_columns(columns))
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        match self.inner.next_record().map_err(ModelError::wrap_source)? {
            Some(record) => self.transform.apply_record(record).map(Some),
            None => Ok(None),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset().map_err(ModelError::wrap_source)
    }
}
