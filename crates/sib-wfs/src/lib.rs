//! Client for the SIB publicWFS.
//!
//! [`WfsClient`] wraps a [`FeatureService`] (the SOAP transport, normally
//! [`HttpService`]) and memoizes feature-type schemas and lookup tables per
//! type name, so each is fetched once per client. [`WfsSource`] exposes one
//! feature type as a [`sib_model::DataSource`] for export and a
//! [`sib_model::DataTarget`] for import.

pub mod cache;
pub mod client;
pub mod error;
pub mod features;
pub mod lookup;
pub mod requests;
pub mod schema;
pub mod service;
pub mod source;
pub mod xml;

pub use cache::MemoCache;
pub use client::{SchemaResolver, WfsClient};
pub use error::{LookupKey, Result, WfsError};
pub use features::{FeatureTypeInfo, RawFeature, RawProperty, parse_capabilities, parse_features};
pub use lookup::{LookupRecord, LookupTable};
pub use requests::{InsertFeature, InsertValue};
pub use schema::{FeatureSchema, FieldDescriptor, parse_schema};
pub use service::{ConnectionConfig, FeatureService, HttpService};
pub use source::{NEVER_ATTACHED, WfsOptions, WfsSource};
