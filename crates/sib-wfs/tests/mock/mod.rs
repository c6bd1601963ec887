//! Canned publicWFS responses for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use sib_filter::CompiledFilter;
use sib_wfs::{FeatureService, Result, WfsError};

pub const OTEINZELBAUM_SCHEMA: &str = include_str!("../fixtures/oteinzelbaum_schema.xml");
pub const ITEBGATTUNG_SCHEMA: &str = include_str!("../fixtures/itebgattung_schema.xml");
pub const OTEINZELBAUM_FEATURES: &str = include_str!("../fixtures/oteinzelbaum_features.xml");
pub const ITEBGATTUNG_FEATURES: &str = include_str!("../fixtures/itebgattung_features.xml");
pub const CAPABILITIES: &str = include_str!("../fixtures/capabilities.xml");
pub const TRANSACTION_SUCCESS: &str = include_str!("../fixtures/transaction_success.xml");

/// Service answering from fixtures and counting every request.
#[derive(Debug, Default)]
pub struct CannedService {
    schemas: HashMap<String, &'static str>,
    features: HashMap<String, &'static str>,
    calls: RefCell<HashMap<String, usize>>,
    filters: RefCell<Vec<Option<String>>>,
    posted: RefCell<Vec<String>>,
    post_response: Option<&'static str>,
}

impl CannedService {
    /// Oteinzelbaum with its Itebgattung lookup.
    pub fn trees() -> Self {
        let mut service = Self::default();
        service
            .schemas
            .insert("Oteinzelbaum".to_string(), OTEINZELBAUM_SCHEMA);
        service
            .schemas
            .insert("Itebgattung".to_string(), ITEBGATTUNG_SCHEMA);
        service
            .features
            .insert("Oteinzelbaum".to_string(), OTEINZELBAUM_FEATURES);
        service
            .features
            .insert("Itebgattung".to_string(), ITEBGATTUNG_FEATURES);
        service
    }

    /// Answer every POST with `response` instead of the success fixture.
    pub fn answering_posts_with(mut self, response: &'static str) -> Self {
        self.post_response = Some(response);
        self
    }

    /// Number of requests of `operation` for `feature_type`.
    pub fn calls(&self, operation: &str, feature_type: &str) -> usize {
        self.calls
            .borrow()
            .get(&format!("{operation}:{feature_type}"))
            .copied()
            .unwrap_or(0)
    }

    /// Filter documents passed to GetFeature, in request order.
    pub fn filters(&self) -> Vec<Option<String>> {
        self.filters.borrow().clone()
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.borrow().clone()
    }

    fn count(&self, operation: &str, feature_type: &str) {
        *self
            .calls
            .borrow_mut()
            .entry(format!("{operation}:{feature_type}"))
            .or_default() += 1;
    }
}

impl FeatureService for CannedService {
    fn fetch_schema(&self, feature_type: &str) -> Result<String> {
        self.count("DescribeFeatureType", feature_type);
        self.schemas
            .get(feature_type)
            .map(|xml| xml.to_string())
            .ok_or_else(|| WfsError::Transport(format!("no schema for {feature_type}")))
    }

    fn fetch_features(
        &self,
        feature_type: &str,
        filter: Option<&CompiledFilter>,
    ) -> Result<String> {
        self.count("GetFeature", feature_type);
        self.filters
            .borrow_mut()
            .push(filter.map(|f| f.as_xml().to_string()));
        self.features
            .get(feature_type)
            .map(|xml| xml.to_string())
            .ok_or_else(|| WfsError::Transport(format!("no features for {feature_type}")))
    }

    fn fetch_capabilities(&self) -> Result<String> {
        self.count("GetCapabilities", "");
        Ok(CAPABILITIES.to_string())
    }

    fn post(&self, body: &str) -> Result<String> {
        self.count("Post", "");
        self.posted.borrow_mut().push(body.to_string());
        Ok(self.post_response.unwrap_or(TRANSACTION_SUCCESS).to_string())
    }
}
