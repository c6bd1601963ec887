use std::collections::HashMap;

use sib_filter::{
    Comparison, CompiledFilter, Connective, Expr, FieldRef, FilterError, PropertyResolver,
    compile, compile_with,
};

/// Resolver backed by a fixed field list; lookup-coded fields map to their code attribute.
struct SchemaFields {
    fields: HashMap<&'static str, bool>,
}

impl SchemaFields {
    fn trees() -> Self {
        Self {
            fields: HashMap::from([("gattung", true), ("art", true), ("krone", false)]),
        }
    }
}

impl PropertyResolver for SchemaFields {
    type Error = FilterError;

    fn resolve(&self, field: &str) -> Result<Option<String>, FilterError> {
        Ok(self.fields.get(field).map(|coded| {
            if *coded {
                format!("{field}/@luk")
            } else {
                field.to_string()
            }
        }))
    }
}

fn compiled(text: &str) -> CompiledFilter {
    compile(text).unwrap_or_else(|e| panic!("compile {text}: {e}"))
}

#[test]
fn and_of_two_equals() {
    let filter = compiled("UND(GLEICH(a, \"1\"), GLEICH(b, \"2\"))");

    let Expr::Connective { kind, children } = filter.expr() else {
        panic!("expected connective, got {:?}", filter.expr());
    };
    assert_eq!(*kind, Connective::And);
    assert_eq!(children.len(), 2);
    for (child, (name, value)) in children.iter().zip([("a", "1"), ("b", "2")]) {
        let Expr::Comparison { op, left, right } = child else {
            panic!("expected comparison, got {child:?}");
        };
        assert_eq!(*op, Comparison::Equal);
        assert_eq!(**left, Expr::Field(FieldRef::plain(name)));
        assert_eq!(**right, Expr::Literal(value.to_string()));
    }

    insta::assert_snapshot!(
        filter.as_xml(),
        @"<ogc:Filter><ogc:And><ogc:PropertyIsEqualTo><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo><ogc:PropertyIsEqualTo><ogc:PropertyName>b</ogc:PropertyName><ogc:Literal>2</ogc:Literal></ogc:PropertyIsEqualTo></ogc:And></ogc:Filter>"
    );
}

#[test]
fn between_keeps_argument_order() {
    let filter = compiled("ZWISCHEN(bst, \"5\", \"20\")");
    let children = filter.expr().children();
    assert_eq!(children.len(), 3);
    assert_eq!(*children[0], Expr::Field(FieldRef::plain("bst")));
    assert_eq!(*children[1], Expr::Literal("5".to_string()));
    assert_eq!(*children[2], Expr::Literal("20".to_string()));

    insta::assert_snapshot!(
        filter.as_xml(),
        @"<ogc:Filter><ogc:PropertyIsBetween><ogc:PropertyName>bst</ogc:PropertyName><ogc:Literal>5</ogc:Literal><ogc:Literal>20</ogc:Literal></ogc:PropertyIsBetween></ogc:Filter>"
    );
}

#[test]
fn every_keyword_has_its_element() {
    let cases = [
        ("GLEICH(a, '1')", "<ogc:PropertyIsEqualTo>"),
        ("IDENTISCH(a, '1')", "<ogc:PropertyIsEqualTo>"),
        ("KLEINER(a, '1')", "<ogc:PropertyIsLessThan>"),
        ("KLEINERGLEICH(a, '1')", "<ogc:PropertyIsLessThanOrEqualTo>"),
        ("GROESSER(a, '1')", "<ogc:PropertyIsGreaterThan>"),
        ("GROESSERGLEICH(a, '1')", "<ogc:PropertyIsGreaterThanOrEqualTo>"),
        ("NICHT(GLEICH(a, '1'))", "<ogc:Not>"),
        ("ODER(GLEICH(a, '1'); GLEICH(a, '2'))", "<ogc:Or>"),
    ];
    for (text, element) in cases {
        let filter = compiled(text);
        assert!(
            filter.as_xml().starts_with(&format!("<ogc:Filter>{element}")),
            "{text} rendered as {}",
            filter.as_xml()
        );
    }
}

#[test]
fn three_open_two_close_is_malformed() {
    let err = compile("UND(GLEICH(a, \"1\"), GLEICH(b, \"2\")").unwrap_err();
    assert!(matches!(err, FilterError::Malformed { .. }), "{err:?}");
}

#[test]
fn open_parenthesis_inside_literal_still_counts() {
    let err = compile(r#"NICHT(GLEICH(a, "("))"#).unwrap_err();
    assert!(matches!(err, FilterError::Malformed { .. }), "{err:?}");
}

#[test]
fn literal_with_double_quote_prints_back_in_single_quotes() {
    let filter = compiled(r#"GLEICH(a, 'x"y')"#);
    let printed = filter.expr().to_string();
    assert_eq!(printed, r#"GLEICH(a, 'x"y')"#);
    assert_eq!(compiled(&printed).expr(), filter.expr());
}

#[test]
fn unknown_keyword_is_rejected() {
    let err = compile("ENTHAELT(a, \"1\")").unwrap_err();
    assert_eq!(
        err,
        FilterError::UnknownOperator {
            keyword: "ENTHAELT".to_string()
        }
    );
}

#[test]
fn wrong_argument_count_is_rejected() {
    assert!(matches!(
        compile("GLEICH(a)").unwrap_err(),
        FilterError::Malformed { .. }
    ));
    assert!(matches!(
        compile("NICHT()").unwrap_err(),
        FilterError::Malformed { .. }
    ));
    assert!(matches!(
        compile("GLEICH(a, \"1\",)").unwrap_err(),
        FilterError::Malformed { .. }
    ));
}

#[test]
fn literal_with_separators_stays_whole() {
    let filter = compiled("GLEICH(name, 'Müller, Hans; jun.')");
    assert_eq!(
        filter.expr().children()[1],
        &Expr::Literal("Müller, Hans; jun.".to_string())
    );
}

#[test]
fn literal_text_is_escaped() {
    let filter = compiled("GLEICH(a, \"x < y & z\")");
    assert!(filter.as_xml().contains("x &lt; y &amp; z"));
}

#[test]
fn validating_mode_addresses_lookup_code() {
    let filter = compile_with("GLEICH(gattung, \"AR1\")", &SchemaFields::trees()).unwrap();
    assert_eq!(
        filter.expr().fields(),
        vec![&FieldRef {
            name: "gattung".to_string(),
            property: "gattung/@luk".to_string(),
        }]
    );
    assert!(
        filter
            .as_xml()
            .contains("<ogc:PropertyName>gattung/@luk</ogc:PropertyName>")
    );

    let plain = compile_with("GROESSER(krone, \"21\")", &SchemaFields::trees()).unwrap();
    assert!(
        plain
            .as_xml()
            .contains("<ogc:PropertyName>krone</ogc:PropertyName>")
    );
}

#[test]
fn validating_mode_rejects_unknown_field() {
    let err = compile_with("GLEICH(hoehe, \"3\")", &SchemaFields::trees()).unwrap_err();
    assert_eq!(
        err,
        FilterError::UnknownField {
            field: "hoehe".to_string()
        }
    );
}

#[test]
fn depth_counts_root() {
    assert_eq!(compiled("vnk").depth(), 1);
    assert_eq!(compiled("GLEICH(vnk, '1')").depth(), 2);
    assert_eq!(
        compiled("ODER(GLEICH(gattung, 'AR1'), NICHT(GLEICH(gattung, 'AR2')))").depth(),
        4
    );
}
