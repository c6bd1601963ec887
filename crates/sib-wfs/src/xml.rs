//! Small namespace-aware element tree for WFS responses.
//!
//! Responses are small enough to hold in memory; a resolved tree keeps the
//! schema and feature parsers free of reader state.

use std::borrow::Cow;

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::{Result, WfsError};

pub const WFS_NS: &str = "http://www.opengis.net/wfs";
pub const OGC_NS: &str = "http://www.opengis.net/ogc";
pub const GML_NS: &str = "http://www.opengis.net/gml";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Namespace of SIB feature types and their schema annotations.
pub const SIB_NS: &str = "http://xml.novasib.de";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        // Text is kept untrimmed: entity references split it into several events.
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event().map_err(WfsError::xml)?;
            let namespace = bound_namespace(&resolved);
            match event {
                Event::Start(start) => stack.push(open_element(&reader, namespace, &start)?),
                Event::Empty(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| WfsError::Xml("unexpected closing tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Text(text) => {
                    let text = unescape(utf8(&text)?).map_err(WfsError::xml)?;
                    push_text(&mut stack, &text);
                }
                Event::GeneralRef(reference) => {
                    let entity = format!("&{};", utf8(&reference)?);
                    let text = unescape(&entity).map_err(WfsError::xml)?;
                    push_text(&mut stack, &text);
                }
                Event::CData(data) => push_text(&mut stack, utf8(&data)?),
                Event::Eof => {
                    return Err(WfsError::Xml("document has no root element".to_string()));
                }
                _ => {}
            }
        }
    }

    /// Element in namespace `ns` with local name `name`.
    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(ns)
    }

    /// Direct text content without surrounding whitespace, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    pub fn child(&self, ns: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(ns, name))
    }

    /// Follow `steps` from this element, returning every match of the last step.
    pub fn find_all(&self, ns: &str, steps: &[&str]) -> Vec<&XmlElement> {
        let mut current = vec![self];
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(|c| c.is(ns, step)))
                .collect();
        }
        current
    }

    /// First match of [`find_all`](Self::find_all).
    pub fn find(&self, ns: &str, steps: &[&str]) -> Option<&XmlElement> {
        self.find_all(ns, steps).into_iter().next()
    }

    /// Value of an attribute without namespace.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn attribute_ns(&self, ns: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(ns) && a.name == name)
            .map(|a| a.value.as_str())
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<XmlElement> {
    let name = utf8(start.local_name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(WfsError::xml)?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attribute.key);
        let value = unescape(utf8(&attribute.value)?).map_err(WfsError::xml)?;
        attributes.push(XmlAttribute {
            namespace: bound_namespace(&resolved),
            name: utf8(local.as_ref())?.to_string(),
            value: value.into_owned(),
        });
    }
    Ok(XmlElement {
        namespace,
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}

fn bound_namespace(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(WfsError::xml)
}

/// Lossy text of a raw response, for error messages.
pub(crate) fn excerpt(text: &str) -> Cow<'_, str> {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((index, _)) => Cow::Owned(format!("{}...", &text[..index])),
        None => Cow::Borrowed(text),
    }
}
