//! Recursive-descent compiler for the filter mini-language.
//!
//! A term is a quoted literal (`"..."` or `'...'`), a bare field name, or a
//! call `KEYWORD(arg, arg, ...)`. The keyword is the text before the first
//! `(`, the arguments are the text up to the last `)`, split with
//! [`split_arguments`] and compiled recursively.

use std::fmt;

use tracing::debug;

use crate::error::{FilterError, Result};
use crate::expr::{Expr, FieldRef, Operator};
use crate::render::render_filter;
use crate::split::split_arguments;

/// Maps bare field names to the property path they are rendered as.
///
/// Validating compilers consult the feature type's schema here; fetching that
/// schema may fail, so resolvers bring their own error type.
pub trait PropertyResolver {
    type Error: From<FilterError>;

    /// Property path of `field`, or `None` if the field does not exist.
    fn resolve(&self, field: &str) -> std::result::Result<Option<String>, Self::Error>;
}

/// Accepts every field name as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unvalidated;

impl PropertyResolver for Unvalidated {
    type Error = FilterError;

    fn resolve(&self, field: &str) -> Result<Option<String>> {
        Ok(Some(field.to_string()))
    }
}

/// A parsed filter together with its XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    source: String,
    expr: Expr,
    xml: String,
}

impl CompiledFilter {
    /// Filter text this filter was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The `ogc:Filter` document.
    pub fn as_xml(&self) -> &str {
        &self.xml
    }

    /// Operator nesting depth counting the wrapping filter element.
    pub fn depth(&self) -> usize {
        self.expr.depth() + 1
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

/// Compile without checking field names.
pub fn compile(text: &str) -> Result<CompiledFilter> {
    compile_with(text, &Unvalidated)
}

/// Compile, resolving every bare field name through `resolver`.
pub fn compile_with<R>(text: &str, resolver: &R) -> std::result::Result<CompiledFilter, R::Error>
where
    R: PropertyResolver + ?Sized,
{
    check_balanced(text)?;
    let expr = parse_term(text, resolver)?;
    let xml = render_filter(&expr)?;
    debug!(filter = text, depth = expr.depth(), "compiled filter");
    Ok(CompiledFilter {
        source: text.to_string(),
        expr,
        xml,
    })
}

/// Counts every parenthesis in the raw text, quoted literals included.
fn check_balanced(text: &str) -> Result<()> {
    let opening = text.matches('(').count();
    let closing = text.matches(')').count();
    if opening != closing {
        return Err(FilterError::malformed(format!(
            "{opening} opening and {closing} closing parentheses"
        )));
    }
    Ok(())
}

fn parse_term<R>(text: &str, resolver: &R) -> std::result::Result<Expr, R::Error>
where
    R: PropertyResolver + ?Sized,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(FilterError::malformed("empty argument").into());
    }
    if let Some(literal) = quoted_literal(text) {
        return Ok(Expr::Literal(literal.to_string()));
    }

    let (Some(open), Some(close)) = (text.find('('), text.rfind(')')) else {
        return parse_field(text, resolver);
    };
    if close < open {
        return Err(FilterError::malformed(format!("misplaced parentheses in '{text}'")).into());
    }
    if close + 1 != text.len() {
        return Err(FilterError::malformed(format!(
            "unexpected text after ')' in '{text}'"
        ))
        .into());
    }

    let keyword = text[..open].trim();
    let op = Operator::from_keyword(keyword).ok_or_else(|| FilterError::UnknownOperator {
        keyword: keyword.to_string(),
    })?;
    let args = split_arguments(&text[open + 1..close])
        .into_iter()
        .map(|arg| parse_term(arg, resolver))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Expr::apply(op, args)?)
}

fn parse_field<R>(name: &str, resolver: &R) -> std::result::Result<Expr, R::Error>
where
    R: PropertyResolver + ?Sized,
{
    if name
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == ',' || c == ';')
    {
        return Err(FilterError::malformed(format!("invalid field name '{name}'")).into());
    }
    match resolver.resolve(name)? {
        Some(property) => Ok(Expr::Field(FieldRef {
            name: name.to_string(),
            property,
        })),
        None => Err(FilterError::UnknownField {
            field: name.to_string(),
        }
        .into()),
    }
}

/// Contents of a term wrapped in matching single or double quotes.
fn quoted_literal(text: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| text.strip_prefix(quote)?.strip_suffix(quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_contents_are_verbatim() {
        assert_eq!(quoted_literal("\"a, b\""), Some("a, b"));
        assert_eq!(quoted_literal("'x'"), Some("x"));
        assert_eq!(quoted_literal("\"\""), Some(""));
        assert_eq!(quoted_literal("\"mixed'"), None);
        assert_eq!(quoted_literal("bare"), None);
    }

    #[test]
    fn unbalanced_rejected_before_parsing() {
        let err = compile("UND(GLEICH(a, \"1\"), NICHT(GLEICH(b, \"2\"))").unwrap_err();
        assert!(matches!(err, FilterError::Malformed { .. }));
    }

    #[test]
    fn parentheses_in_literals_are_counted() {
        let err = compile(r#"GLEICH(name, "Kreuzung (Nord")"#).unwrap_err();
        assert!(matches!(err, FilterError::Malformed { .. }));
        let err = compile(r#"NICHT(GLEICH(a, "("))"#).unwrap_err();
        assert!(matches!(err, FilterError::Malformed { .. }));
        let filter = compile(r#"GLEICH(name, "Kreuzung (Nord)")"#).unwrap();
        assert!(filter.as_xml().contains("<ogc:Literal>Kreuzung (Nord)</ogc:Literal>"));
    }

    #[test]
    fn trailing_text_rejected() {
        let err = compile("GLEICH(a, \"1\") x").unwrap_err();
        assert!(matches!(err, FilterError::Malformed { .. }));
    }
}
