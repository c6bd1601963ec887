//! The publicWFS as a record source and target.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use sib_filter::CompiledFilter;
use sib_model::{Column, ColumnType, Columns, DataSource, DataTarget, Record, Value, WriteSummary};

use crate::client::WfsClient;
use crate::error::{Result, WfsError};
use crate::features::{FeatureTypeInfo, RawFeature, RawProperty};
use crate::requests::{self, InsertFeature, InsertValue};
use crate::schema::{FeatureSchema, FieldDescriptor};
use crate::service::FeatureService;

/// Lookup types whose records are never appended to exported rows.
pub const NEVER_ATTACHED: [&str; 2] = ["AsbAbschn", "Projekt"];

/// How lookup-coded fields are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WfsOptions {
    /// Emit only the short code; otherwise also `<field>.href`,
    /// `<field>.typeName` and `<field>.luk`.
    pub compact: bool,
    /// Append the referenced lookup record as `<field>.<column>`.
    pub attach_lookups: bool,
}

impl Default for WfsOptions {
    fn default() -> Self {
        Self {
            compact: true,
            attach_lookups: false,
        }
    }
}

/// Records of one feature type, read through GetFeature and written through
/// a Transaction.
#[derive(Debug)]
pub struct WfsSource<S> {
    client: WfsClient<S>,
    feature_type: Option<String>,
    filter: Option<CompiledFilter>,
    options: WfsOptions,
    columns: Option<Columns>,
    rows: Option<Vec<Record>>,
    position: usize,
}

impl<S: FeatureService> WfsSource<S> {
    pub fn new(client: WfsClient<S>, options: WfsOptions) -> Self {
        Self {
            client,
            feature_type: None,
            filter: None,
            options,
            columns: None,
            rows: None,
            position: 0,
        }
    }

    pub fn with_feature_type(
        client: WfsClient<S>,
        feature_type: impl Into<String>,
        options: WfsOptions,
    ) -> Self {
        let mut source = Self::new(client, options);
        source.feature_type = Some(feature_type.into());
        source
    }

    pub fn client(&self) -> &WfsClient<S> {
        &self.client
    }

    pub fn options(&self) -> WfsOptions {
        self.options
    }

    pub fn feature_type(&self) -> Result<&str> {
        self.feature_type
            .as_deref()
            .ok_or(WfsError::MissingFeatureType)
    }

    /// Choose the feature type. Allowed once.
    pub fn set_feature_type(&mut self, feature_type: impl Into<String>) -> Result<()> {
        if let Some(current) = &self.feature_type {
            return Err(WfsError::FeatureTypeAlreadySet(current.clone()));
        }
        self.feature_type = Some(feature_type.into());
        Ok(())
    }

    /// Restrict reads by a filter, validated against this feature type.
    pub fn set_filter(&mut self, text: &str) -> Result<()> {
        let feature_type = self.feature_type()?.to_string();
        let filter = self.client.compile_filter(&feature_type, text)?;
        debug!(feature_type, filter = text, "filter set");
        self.filter = Some(filter);
        self.rows = None;
        self.position = 0;
        Ok(())
    }

    pub fn filter(&self) -> Option<&CompiledFilter> {
        self.filter.as_ref()
    }

    pub fn list_feature_types(&self) -> Result<Vec<FeatureTypeInfo>> {
        self.client.list_feature_types()
    }

    /// Schema of `feature_type`, or of this source's own type.
    pub fn describe_feature_type(&self, feature_type: Option<&str>) -> Result<Arc<FeatureSchema>> {
        let feature_type = match feature_type {
            Some(name) => name,
            None => self.feature_type()?,
        };
        self.client.describe_feature_type(feature_type)
    }

    pub fn raw_request(&self, body: &str) -> Result<String> {
        self.client.raw_request(body)
    }

    fn load_columns(&mut self) -> Result<&Columns> {
        if self.columns.is_none() {
            let columns = self.build_columns()?;
            self.columns = Some(columns);
        }
        self.columns.as_ref().ok_or(WfsError::MissingFeatureType)
    }

    fn build_columns(&self) -> Result<Columns> {
        let schema = self.describe_feature_type(None)?;
        let mut columns = Columns::new();
        for field in schema.iter() {
            let ty = field.column_type();
            columns.insert(Column::new(field.name.as_str(), ty));
            let Some(lookup_type) = field.lookup_type.as_deref() else {
                continue;
            };
            if !self.options.compact {
                columns.insert(Column::text(format!("{}.href", field.name)));
                columns.insert(Column::text(format!("{}.typeName", field.name)));
                columns.insert(Column::new(format!("{}.luk", field.name), ty));
            }
            if self.attaches(lookup_type) {
                let lookup_schema = self.client.describe_feature_type(lookup_type)?;
                for lookup_field in lookup_schema.iter() {
                    columns.insert(Column::new(
                        format!("{}.{}", field.name, lookup_field.name),
                        lookup_field.column_type(),
                    ));
                }
            }
        }
        Ok(columns)
    }

    fn attaches(&self, lookup_type: &str) -> bool {
        self.options.attach_lookups && !NEVER_ATTACHED.contains(&lookup_type)
    }

    fn load_rows(&mut self) -> Result<()> {
        if self.rows.is_some() {
            return Ok(());
        }
        let feature_type = self.feature_type()?.to_string();
        let columns = self.load_columns()?.clone();
        let features = self
            .client
            .fetch_features(&feature_type, self.filter.as_ref())?;

        let mut rows = Vec::with_capacity(features.len());
        for feature in &features {
            rows.push(self.feature_record(&columns, feature)?);
        }
        info!(feature_type, count = rows.len(), "features read");
        self.rows = Some(rows);
        Ok(())
    }

    fn feature_record(&self, columns: &Columns, feature: &RawFeature) -> Result<Record> {
        let mut record = Record::new();
        for property in &feature.properties {
            if let Some(text) = &property.text {
                record.insert(property.name.as_str(), typed(columns, &property.name, text));
                continue;
            }
            if let Some(code) = property.code() {
                record.insert(property.name.as_str(), typed(columns, &property.name, code));
            }
            if !self.options.compact {
                for attribute in &property.attributes {
                    let name = format!("{}.{}", property.name, attribute.name);
                    let value = typed(columns, &name, &attribute.value);
                    record.insert(name, value);
                }
            }
            self.attach_lookup(columns, property, &mut record)?;
        }
        Ok(record)
    }

    fn attach_lookup(
        &self,
        columns: &Columns,
        property: &RawProperty,
        record: &mut Record,
    ) -> Result<()> {
        let (Some(type_name), Some(href)) = (property.type_name(), property.href()) else {
            return Ok(());
        };
        if !self.attaches(type_name) {
            return Ok(());
        }
        let lookup = self.client.resolve_by_reference(type_name, href)?;
        for (field, value) in &lookup.fields {
            if let Some(value) = value {
                let name = format!("{}.{field}", property.name);
                let value = typed(columns, &name, value);
                record.insert(name, value);
            }
        }
        Ok(())
    }

    fn insert_feature(
        &self,
        schema: &FeatureSchema,
        record: &Record,
        reported: &mut BTreeSet<String>,
    ) -> Result<InsertFeature> {
        for (name, _) in record.iter() {
            if !schema.contains(name) && reported.insert(name.clone()) {
                warn!(field = name.as_str(), "field does not exist, skipped");
            }
        }

        let mut properties = Vec::new();
        for field in schema.iter() {
            let Some(value) = record.get(&field.name) else {
                continue;
            };
            if field.read_only {
                if reported.insert(field.name.clone()) {
                    warn!(field = field.name.as_str(), "field is read-only, skipped");
                }
                continue;
            }
            properties.push((field.name.clone(), self.insert_value(field, value)?));
        }

        Ok(InsertFeature {
            feature_type: schema.feature_type.clone(),
            properties,
        })
    }

    fn insert_value(&self, field: &FieldDescriptor, value: &Value) -> Result<InsertValue> {
        let text = value.to_string();
        let Some(type_name) = field.lookup_type.as_deref() else {
            return Ok(InsertValue::Text(text));
        };
        let lookup = self.client.resolve_by_code(type_name, &text)?;
        Ok(InsertValue::Lookup {
            href: lookup.reference,
            type_name: type_name.to_string(),
            code: text,
        })
    }
}

/// Parse `raw` as the type of column `name`, falling back to text.
fn typed(columns: &Columns, name: &str, raw: &str) -> Value {
    let ty = columns.get(name).map_or(ColumnType::Text, |c| c.ty);
    match ty.parse(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(column = name, %err, "value kept as text");
            Value::text(raw)
        }
    }
}

impl<S: FeatureService> DataSource for WfsSource<S> {
    type Error = WfsError;

    fn columns(&mut self) -> Result<Columns> {
        self.load_columns().cloned()
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        self.load_rows()?;
        let record = self
            .rows
            .as_ref()
            .and_then(|rows| rows.get(self.position))
            .cloned();
        if record.is_some() {
            self.position += 1;
        }
        Ok(record)
    }

    /// Rewind without fetching again.
    fn reset(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

impl<S: FeatureService> DataTarget for WfsSource<S> {
    type Error = WfsError;

    /// Insert every record of `source` in one transaction.
    ///
    /// Fields missing from the schema and read-only fields are skipped.
    /// Lookup-coded fields must hold a known code.
    fn write<D: DataSource>(&mut self, source: &mut D) -> Result<WriteSummary> {
        let feature_type = self.feature_type()?.to_string();
        let schema = self.client.describe_feature_type(&feature_type)?;

        let mut reported = BTreeSet::new();
        let mut features = Vec::new();
        while let Some(record) = source
            .next_record()
            .map_err(|e| WfsError::Source(Box::new(e)))?
        {
            features.push(self.insert_feature(&schema, &record, &mut reported)?);
        }

        let body = requests::transaction(&features)?;
        let success = self.client.transaction(&body)?;
        if success {
            info!(feature_type, records = features.len(), "transaction succeeded");
        } else {
            warn!(feature_type, records = features.len(), "transaction not confirmed");
        }
        Ok(WriteSummary {
            records: features.len(),
            success,
        })
    }
}
