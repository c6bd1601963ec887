//! Lookup ("Klartext") tables: code and reference indexes over one fetch.

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::error::{LookupKey, Result, WfsError};
use crate::features::RawFeature;

/// Full record of one lookup feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRecord {
    pub type_name: String,
    /// Short code (`luk`).
    pub code: String,
    /// Reference handle (`#` + feature id).
    pub reference: String,
    /// Child elements of the feature; `None` for empty elements.
    pub fields: BTreeMap<String, Option<String>>,
}

impl LookupRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Option::as_deref)
    }
}

/// Every record of one lookup feature type, indexed by code and by reference.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    type_name: String,
    records: Vec<LookupRecord>,
    by_code: HashMap<String, usize>,
    by_reference: HashMap<String, usize>,
}

impl LookupTable {
    /// Index `features`. Features without code or id cannot be referenced and
    /// are dropped.
    pub fn from_features(type_name: &str, features: Vec<RawFeature>) -> Self {
        let mut table = Self {
            type_name: type_name.to_string(),
            ..Self::default()
        };

        for feature in features {
            let (Some(reference), Some(code)) = (feature.reference(), feature.code.clone()) else {
                warn!(
                    type_name,
                    id = feature.id.as_deref().unwrap_or_default(),
                    "lookup feature without code or id skipped"
                );
                continue;
            };
            let fields = feature
                .properties
                .into_iter()
                .map(|p| (p.name, p.text))
                .collect();
            let index = table.records.len();
            table.by_code.insert(code.clone(), index);
            table.by_reference.insert(reference.clone(), index);
            table.records.push(LookupRecord {
                type_name: type_name.to_string(),
                code,
                reference,
                fields,
            });
        }

        if table.by_code.is_empty() {
            warn!(type_name, "no lookup records loaded");
        } else {
            info!(type_name, count = table.by_code.len(), "lookup records loaded");
        }
        table
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn by_code(&self, code: &str) -> Result<&LookupRecord> {
        self.by_code
            .get(code)
            .map(|&index| &self.records[index])
            .ok_or_else(|| WfsError::lookup_not_found(&self.type_name, code, LookupKey::Code))
    }

    pub fn by_reference(&self, reference: &str) -> Result<&LookupRecord> {
        self.by_reference
            .get(reference)
            .map(|&index| &self.records[index])
            .ok_or_else(|| {
                WfsError::lookup_not_found(&self.type_name, reference, LookupKey::Reference)
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LookupRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::RawProperty;

    fn feature(id: &str, code: &str, name: &str) -> RawFeature {
        RawFeature {
            id: Some(id.to_string()),
            code: Some(code.to_string()),
            properties: vec![RawProperty {
                name: "langtext".to_string(),
                text: Some(name.to_string()),
                attributes: Vec::new(),
            }],
        }
    }

    #[test]
    fn indexes_by_code_and_reference() {
        let table = LookupTable::from_features(
            "Itebgattung",
            vec![feature("g1", "AR1", "Ahorn"), feature("g2", "LI", "Linde")],
        );
        assert_eq!(table.len(), 2);

        let linde = table.by_code("LI").unwrap();
        assert_eq!(linde.reference, "#g2");
        assert_eq!(linde.field("langtext"), Some("Linde"));
        assert_eq!(table.by_reference("#g1").unwrap().code, "AR1");
    }

    #[test]
    fn missing_keys_name_the_index() {
        let table = LookupTable::from_features("Itebgattung", vec![feature("g1", "AR1", "Ahorn")]);
        match table.by_reference("g1").unwrap_err() {
            WfsError::LookupNotFound { by, key, .. } => {
                assert_eq!(by, LookupKey::Reference);
                assert_eq!(key, "g1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn features_without_code_are_dropped() {
        let mut orphan = feature("g3", "", "x");
        orphan.code = None;
        let table = LookupTable::from_features("Itebgattung", vec![orphan]);
        assert!(table.is_empty());
    }
}
