//! SOAP request documents sent to the publicWFS.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use sib_filter::CompiledFilter;

use crate::error::{Result, WfsError};
use crate::xml::{GML_NS, OGC_NS, SIB_NS, WFS_NS, XLINK_NS, XSI_NS};

const WFS_BASIC_SCHEMA: &str =
    "http://www.opengis.net/wfs http://schemas.opengis.net/wfs/1.0.0/WFS-basic.xsd";
const WFS_TRANSACTION_SCHEMA: &str =
    "http://www.opengis.net/wfs http://schemas.opengis.net/wfs/1.0.0/WFS-transaction.xsd";

/// Value of one property in an inserted feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertValue {
    Text(String),
    /// Reference into a lookup feature type.
    Lookup {
        href: String,
        type_name: String,
        code: String,
    },
}

/// One feature of a `wfs:Insert`, properties in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFeature {
    pub feature_type: String,
    pub properties: Vec<(String, InsertValue)>,
}

pub fn get_capabilities() -> Result<String> {
    document(|writer| {
        let root = wfs_root("wfs:GetCapabilities", "1.0.0");
        write(writer, Event::Start(root))?;
        write(writer, Event::End(BytesEnd::new("wfs:GetCapabilities")))
    })
}

pub fn describe_feature_type(feature_type: &str) -> Result<String> {
    document(|writer| {
        let root = wfs_root("wfs:DescribeFeatureType", "1.1.0");
        write(writer, Event::Start(root))?;
        write_text_element(writer, "wfs:TypeName", feature_type)?;
        write(writer, Event::End(BytesEnd::new("wfs:DescribeFeatureType")))
    })
}

/// GetFeature for `feature_type`; the filter document is embedded verbatim.
pub fn get_feature(feature_type: &str, filter: Option<&CompiledFilter>) -> Result<String> {
    document(|writer| {
        let root = wfs_root("wfs:GetFeature", "1.0.0");
        write(writer, Event::Start(root))?;

        let mut query = BytesStart::new("wfs:Query");
        query.push_attribute(("typeName", feature_type));
        match filter {
            Some(filter) => {
                write(writer, Event::Start(query))?;
                write(writer, Event::Text(BytesText::from_escaped(filter.as_xml())))?;
                write(writer, Event::End(BytesEnd::new("wfs:Query")))?;
            }
            None => write(writer, Event::Empty(query))?,
        }

        write(writer, Event::End(BytesEnd::new("wfs:GetFeature")))
    })
}

/// Transaction inserting every feature in one `wfs:Insert`.
pub fn transaction(features: &[InsertFeature]) -> Result<String> {
    document(|writer| {
        let mut root = BytesStart::new("wfs:Transaction");
        root.push_attribute(("service", "WFS"));
        root.push_attribute(("version", "1.0.0"));
        root.push_attribute(("xmlns", SIB_NS));
        push_namespaces(&mut root);
        root.push_attribute(("xsi:schemaLocation", WFS_TRANSACTION_SCHEMA));
        write(writer, Event::Start(root))?;
        write(writer, Event::Start(BytesStart::new("wfs:Insert")))?;

        for feature in features {
            write_feature(writer, feature)?;
        }

        write(writer, Event::End(BytesEnd::new("wfs:Insert")))?;
        write(writer, Event::End(BytesEnd::new("wfs:Transaction")))
    })
}

fn write_feature<W: Write>(writer: &mut Writer<W>, feature: &InsertFeature) -> Result<()> {
    write(
        writer,
        Event::Start(BytesStart::new(feature.feature_type.as_str())),
    )?;
    for (name, value) in &feature.properties {
        match value {
            InsertValue::Text(text) => write_text_element(writer, name, text)?,
            InsertValue::Lookup {
                href,
                type_name,
                code,
            } => {
                let mut element = BytesStart::new(name.as_str());
                element.push_attribute(("xlink:href", href.as_str()));
                element.push_attribute(("typeName", type_name.as_str()));
                element.push_attribute(("luk", code.as_str()));
                write(writer, Event::Empty(element))?;
            }
        }
    }
    write(
        writer,
        Event::End(BytesEnd::new(feature.feature_type.as_str())),
    )
}

fn wfs_root(name: &str, version: &str) -> BytesStart<'static> {
    let mut root = BytesStart::new(name.to_string());
    root.push_attribute(("service", "WFS"));
    root.push_attribute(("version", version));
    root.push_attribute(("xmlns", WFS_NS));
    push_namespaces(&mut root);
    root.push_attribute(("xsi:schemaLocation", WFS_BASIC_SCHEMA));
    root
}

fn push_namespaces(root: &mut BytesStart<'_>) {
    root.push_attribute(("xmlns:wfs", WFS_NS));
    root.push_attribute(("xmlns:gml", GML_NS));
    root.push_attribute(("xmlns:ogc", OGC_NS));
    root.push_attribute(("xmlns:xlink", XLINK_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
}

fn document<F>(body: F) -> Result<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    body(&mut writer)?;
    String::from_utf8(writer.into_inner()).map_err(WfsError::xml)
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(WfsError::xml)
}
