//! Feature-type descriptions from DescribeFeatureType responses.

use sib_model::ColumnType;

use crate::error::{Result, WfsError};
use crate::xml::{SIB_NS, XSD_NS, XmlElement, excerpt};

const FIELD_PATH: [&str; 5] = [
    "complexType",
    "complexContent",
    "extension",
    "sequence",
    "element",
];

/// Metadata of one field of a feature type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub documentation: Option<String>,
    pub read_only: bool,
    /// Lookup feature type this field references by code.
    pub lookup_type: Option<String>,
    /// Base type of the field's restriction, e.g. `xs:string`.
    pub declared_type: Option<String>,
    pub max_length: Option<String>,
    pub total_digits: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.lookup_type.is_some()
    }

    /// Declared type with its qualifiers, e.g. `xs:string(40)`.
    pub fn type_string(&self) -> Option<String> {
        let mut ty = self.declared_type.clone()?;
        for qualifier in [&self.max_length, &self.total_digits].into_iter().flatten() {
            ty.push('(');
            ty.push_str(qualifier);
            ty.push(')');
        }
        Some(ty)
    }

    /// Column type values of this field are read as.
    pub fn column_type(&self) -> ColumnType {
        let Some(declared) = self.declared_type.as_deref() else {
            return ColumnType::Text;
        };
        let local = declared.rsplit(':').next().unwrap_or(declared);
        match local.to_ascii_lowercase().as_str() {
            "integer" | "int" | "long" | "short" | "byte" | "nonnegativeinteger"
            | "positiveinteger" | "unsignedint" | "unsignedlong" => ColumnType::Integer,
            "float" | "double" | "decimal" => ColumnType::Float,
            "date" | "datetime" => ColumnType::DateTime,
            _ => ColumnType::Text,
        }
    }
}

/// Fields of one feature type in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    pub feature_type: String,
    fields: Vec<FieldDescriptor>,
}

impl FeatureSchema {
    pub fn new(feature_type: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            feature_type: feature_type.into(),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FeatureSchema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Parse a DescribeFeatureType response.
///
/// Annotation, read-only marker, lookup marker and type restriction are read
/// independently; a field missing any of them keeps defaults for that part.
pub fn parse_schema(feature_type: &str, xml: &str) -> Result<FeatureSchema> {
    let root = XmlElement::parse(xml)?;
    if !root.is(XSD_NS, "schema") {
        return Err(WfsError::UnexpectedResponse {
            message: format!(
                "DescribeFeatureType for {feature_type} returned <{}>: {}",
                root.name,
                excerpt(xml)
            ),
        });
    }

    let mut fields = Vec::new();
    for element in root.find_all(XSD_NS, &FIELD_PATH) {
        let Some(name) = element.attribute("name") else {
            continue;
        };
        fields.push(parse_field(name, element));
    }
    Ok(FeatureSchema::new(feature_type, fields))
}

fn parse_field(name: &str, element: &XmlElement) -> FieldDescriptor {
    let mut field = FieldDescriptor::new(name);

    if let Some(annotation) = element.child(XSD_NS, "annotation") {
        field.documentation = annotation
            .child(XSD_NS, "documentation")
            .and_then(XmlElement::text)
            .map(str::to_string);

        if let Some(appinfo) = annotation.child(XSD_NS, "appinfo") {
            field.read_only = appinfo
                .child(SIB_NS, "readOnly")
                .and_then(XmlElement::text)
                .is_some_and(|text| text.trim() == "true");
            field.lookup_type = appinfo
                .child(SIB_NS, "typeName")
                .and_then(XmlElement::text)
                .map(|text| text.trim().to_string());
        }
    }

    if let Some(restriction) = element.find(XSD_NS, &["simpleType", "restriction"]) {
        field.declared_type = restriction.attribute("base").map(str::to_string);
        field.max_length = facet(restriction, "maxLength");
        field.total_digits = facet(restriction, "totalDigits");
    }

    field
}

fn facet(restriction: &XmlElement, name: &str) -> Option<String> {
    restriction
        .child(XSD_NS, name)
        .and_then(|facet| facet.attribute("value"))
        .map(str::to_string)
}
