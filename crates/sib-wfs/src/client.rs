//! Cached access to feature schemas and lookup tables.

use std::sync::Arc;

use tracing::debug;

use sib_filter::{CompiledFilter, PropertyResolver, compile_with};

use crate::cache::MemoCache;
use crate::error::{Result, WfsError};
use crate::features::{FeatureTypeInfo, RawFeature, parse_capabilities, parse_features};
use crate::lookup::{LookupRecord, LookupTable};
use crate::schema::{FeatureSchema, parse_schema};
use crate::service::FeatureService;
use crate::xml::XmlElement;

/// Client over a [`FeatureService`] that fetches every schema and every
/// lookup table at most once.
#[derive(Debug)]
pub struct WfsClient<S> {
    service: S,
    schemas: MemoCache<FeatureSchema>,
    lookups: MemoCache<LookupTable>,
}

impl<S: FeatureService> WfsClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            schemas: MemoCache::new(),
            lookups: MemoCache::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Feature types offered by the service, as `(name, title)`.
    pub fn list_feature_types(&self) -> Result<Vec<FeatureTypeInfo>> {
        let xml = self.service.fetch_capabilities()?;
        parse_capabilities(&xml)
    }

    /// Field descriptions of `feature_type`, fetched on first use.
    pub fn describe_feature_type(&self, feature_type: &str) -> Result<Arc<FeatureSchema>> {
        self.schemas.get_or_try_insert_with(feature_type, || {
            debug!(feature_type, "fetching feature schema");
            let xml = self.service.fetch_schema(feature_type)?;
            let schema = parse_schema(feature_type, &xml)?;
            debug!(feature_type, fields = schema.len(), "feature schema cached");
            Ok(schema)
        })
    }

    /// Every instance of `feature_type` matching `filter`. Not cached.
    pub fn fetch_features(
        &self,
        feature_type: &str,
        filter: Option<&CompiledFilter>,
    ) -> Result<Vec<RawFeature>> {
        debug!(
            feature_type,
            filtered = filter.is_some(),
            "fetching features"
        );
        let xml = self.service.fetch_features(feature_type, filter)?;
        parse_features(feature_type, &xml)
    }

    /// All records of lookup type `type_name`, fetched on first use.
    pub fn lookup_table(&self, type_name: &str) -> Result<Arc<LookupTable>> {
        self.lookups.get_or_try_insert_with(type_name, || {
            let features = self.fetch_features(type_name, None)?;
            Ok(LookupTable::from_features(type_name, features))
        })
    }

    pub fn resolve_by_code(&self, type_name: &str, code: &str) -> Result<LookupRecord> {
        self.lookup_table(type_name)?.by_code(code).cloned()
    }

    pub fn resolve_by_reference(&self, type_name: &str, reference: &str) -> Result<LookupRecord> {
        self.lookup_table(type_name)?
            .by_reference(reference)
            .cloned()
    }

    /// Compile `text`, validating field names against `feature_type`.
    pub fn compile_filter(&self, feature_type: &str, text: &str) -> Result<CompiledFilter> {
        compile_with(text, &SchemaResolver::new(self, feature_type))
    }

    /// Post `body` unchanged and return the response document.
    pub fn raw_request(&self, body: &str) -> Result<String> {
        debug!(bytes = body.len(), "raw publicWFS request");
        self.service.post(body)
    }

    /// Post a transaction and report whether the service accepted it.
    pub fn transaction(&self, body: &str) -> Result<bool> {
        let response = self.service.post(body)?;
        match XmlElement::parse(&response) {
            Ok(root) => crate::features::check_exception(&root, &response)?,
            Err(error) => debug!(%error, "transaction response is not well-formed XML"),
        }
        Ok(response.contains("SUCCESS"))
    }
}

/// Resolves filter fields through a feature type's schema.
///
/// Lookup-coded fields address their short code, `field/@luk`.
pub struct SchemaResolver<'a, S> {
    client: &'a WfsClient<S>,
    feature_type: &'a str,
}

impl<'a, S: FeatureService> SchemaResolver<'a, S> {
    pub fn new(client: &'a WfsClient<S>, feature_type: &'a str) -> Self {
        Self {
            client,
            feature_type,
        }
    }
}

impl<S: FeatureService> PropertyResolver for SchemaResolver<'_, S> {
    type Error = WfsError;

    fn resolve(&self, field: &str) -> Result<Option<String>> {
        let schema = self.client.describe_feature_type(self.feature_type)?;
        Ok(schema.get(field).map(|descriptor| {
            if descriptor.is_lookup() {
                format!("{field}/@luk")
            } else {
                field.to_string()
            }
        }))
    }
}
