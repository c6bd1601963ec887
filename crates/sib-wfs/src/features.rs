//! Feature instances and capabilities from GetFeature / GetCapabilities.

use crate::error::{Result, WfsError};
use crate::xml::{SIB_NS, WFS_NS, XLINK_NS, XmlAttribute, XmlElement, excerpt};

/// One child element of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub name: String,
    pub text: Option<String>,
    pub attributes: Vec<XmlAttribute>,
}

impl RawProperty {
    /// Short code of a lookup-coded property.
    pub fn code(&self) -> Option<&str> {
        self.attribute(None, "luk")
    }

    /// Reference handle of a lookup-coded property.
    pub fn href(&self) -> Option<&str> {
        self.attribute(Some(XLINK_NS), "href")
    }

    /// Lookup feature type a coded property points into.
    pub fn type_name(&self) -> Option<&str> {
        self.attribute(None, "typeName")
    }

    fn attribute(&self, ns: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == ns)
            .map(|a| a.value.as_str())
    }
}

/// One feature instance as delivered by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeature {
    /// Feature id (`fid`).
    pub id: Option<String>,
    /// Short code (`luk`), set on lookup features.
    pub code: Option<String>,
    pub properties: Vec<RawProperty>,
}

impl RawFeature {
    /// Reference handle other features use to point at this one.
    pub fn reference(&self) -> Option<String> {
        self.id.as_ref().map(|id| format!("#{id}"))
    }

    pub fn property(&self, name: &str) -> Option<&RawProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Feature type offered by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTypeInfo {
    pub name: String,
    pub title: String,
}

/// Parse a GetFeature response, keeping only instances of `feature_type`.
pub fn parse_features(feature_type: &str, xml: &str) -> Result<Vec<RawFeature>> {
    let root = XmlElement::parse(xml)?;
    check_exception(&root, xml)?;

    let features = root
        .find_all(SIB_NS, &["Objekt", feature_type])
        .into_iter()
        .map(|element| RawFeature {
            id: element.attribute("fid").map(str::to_string),
            code: element.attribute("luk").map(str::to_string),
            properties: element
                .children
                .iter()
                .map(|child| RawProperty {
                    name: child.name.clone(),
                    text: child.text().map(str::to_string),
                    attributes: child.attributes.clone(),
                })
                .collect(),
        })
        .collect();
    Ok(features)
}

/// Parse a GetCapabilities response into its feature type list.
pub fn parse_capabilities(xml: &str) -> Result<Vec<FeatureTypeInfo>> {
    let root = XmlElement::parse(xml)?;
    check_exception(&root, xml)?;

    let types = root
        .find_all(WFS_NS, &["FeatureTypeList", "FeatureType"])
        .into_iter()
        .filter_map(|element| {
            let name = element.child(WFS_NS, "Name")?.text()?;
            let title = element.child(WFS_NS, "Title")?.text()?;
            Some(FeatureTypeInfo {
                name: name.to_string(),
                title: title.to_string(),
            })
        })
        .collect();
    Ok(types)
}

/// Reject exception reports, which arrive with a success status.
pub(crate) fn check_exception(root: &XmlElement, xml: &str) -> Result<()> {
    if !root.name.ends_with("ExceptionReport") {
        return Ok(());
    }
    let message = exception_text(root).unwrap_or_else(|| excerpt(xml).into_owned());
    Err(WfsError::UnexpectedResponse { message })
}

fn exception_text(element: &XmlElement) -> Option<String> {
    if let Some(text) = element.text() {
        return Some(text.trim().to_string());
    }
    element.children.iter().find_map(exception_text)
}
