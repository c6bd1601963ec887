//! OGC filter XML output for expression trees.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{FilterError, Result};
use crate::expr::{Comparison, Connective, Expr};

/// Root element wrapping a compiled filter.
pub const FILTER_TAG: &str = "ogc:Filter";

/// Element holding a literal value.
pub const LITERAL_TAG: &str = "ogc:Literal";

/// Element holding a property reference.
pub const PROPERTY_TAG: &str = "ogc:PropertyName";

/// Element name an operator node is rendered as.
pub fn element_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal(_) => LITERAL_TAG,
        Expr::Field(_) => PROPERTY_TAG,
        Expr::Connective { kind, .. } => match kind {
            Connective::And => "ogc:And",
            Connective::Or => "ogc:Or",
            Connective::Not => "ogc:Not",
        },
        Expr::Comparison { op, .. } => match op {
            Comparison::Equal => "ogc:PropertyIsEqualTo",
            Comparison::LessThan => "ogc:PropertyIsLessThan",
            Comparison::LessOrEqual => "ogc:PropertyIsLessThanOrEqualTo",
            Comparison::GreaterThan => "ogc:PropertyIsGreaterThan",
            Comparison::GreaterOrEqual => "ogc:PropertyIsGreaterThanOrEqualTo",
        },
        Expr::Between { .. } => "ogc:PropertyIsBetween",
    }
}

/// Render `expr` wrapped in an `ogc:Filter` element.
///
/// The `ogc` prefix is expected to be declared by the enclosing request.
pub fn render_filter(expr: &Expr) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write(&mut writer, Event::Start(BytesStart::new(FILTER_TAG)))?;
    write_expr(&mut writer, expr)?;
    write(&mut writer, Event::End(BytesEnd::new(FILTER_TAG)))?;
    String::from_utf8(writer.into_inner()).map_err(|e| FilterError::Xml(e.to_string()))
}

fn write_expr<W: Write>(writer: &mut Writer<W>, expr: &Expr) -> Result<()> {
    let name = element_name(expr);
    match expr {
        Expr::Literal(text) => write_text_element(writer, name, text),
        Expr::Field(field) => write_text_element(writer, name, &field.property),
        _ => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for child in expr.children() {
                write_expr(writer, child)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| FilterError::Xml(e.to_string()))
}
