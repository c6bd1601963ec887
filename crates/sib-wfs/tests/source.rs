//! Reading and writing feature types through `WfsSource`.

mod mock;

use chrono::NaiveDate;
use mock::CannedService;
use sib_model::{
    Column, ColumnType, Columns, DataSource, DataTarget, MemorySource, Record, Value, head,
};
use sib_wfs::{WfsClient, WfsError, WfsOptions, WfsSource};

fn trees(options: WfsOptions) -> WfsSource<CannedService> {
    WfsSource::with_feature_type(WfsClient::new(CannedService::trees()), "Oteinzelbaum", options)
}

fn read_all<S: DataSource>(source: &mut S) -> Vec<Record> {
    let mut records = Vec::new();
    while let Some(record) = source.next_record().unwrap() {
        records.push(record);
    }
    records
}

#[test]
fn compact_columns_follow_schema() {
    let mut source = trees(WfsOptions::default());
    let columns = source.columns().unwrap();
    let described: Vec<(&str, ColumnType)> =
        columns.iter().map(|c| (c.name.as_str(), c.ty)).collect();
    assert_eq!(
        described,
        [
            ("objektId", ColumnType::Text),
            ("krone", ColumnType::Integer),
            ("gattung", ColumnType::Text),
            ("pflanzdatum", ColumnType::DateTime),
            ("bemerkung", ColumnType::Text),
        ]
    );
}

#[test]
fn compact_records_hold_typed_values_and_codes() {
    let mut source = trees(WfsOptions::default());
    let records = read_all(&mut source);
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.get("objektId"), Some(&Value::text("B-1")));
    assert_eq!(first.get("krone"), Some(&Value::Integer(12)));
    assert_eq!(first.get("gattung"), Some(&Value::text("AR1")));
    assert_eq!(
        first.get("pflanzdatum"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2019, 4, 1).unwrap()))
    );
    assert!(!first.contains("gattung.href"));
    assert!(!first.contains("bemerkung"));

    // unparseable numbers stay text
    assert_eq!(records[1].get("krone"), Some(&Value::text("gross")));
}

#[test]
fn full_mode_adds_reference_columns() {
    let options = WfsOptions {
        compact: false,
        attach_lookups: false,
    };
    let mut source = trees(options);
    let columns = source.columns().unwrap();
    for name in ["gattung.href", "gattung.typeName", "gattung.luk"] {
        assert!(columns.contains(name), "missing column {name}");
    }

    let records = read_all(&mut source);
    assert_eq!(records[0].get("gattung.href"), Some(&Value::text("#g1")));
    assert_eq!(
        records[0].get("gattung.typeName"),
        Some(&Value::text("Itebgattung"))
    );
    assert_eq!(records[0].get("gattung.luk"), Some(&Value::text("AR1")));
    assert_eq!(records[1].get("gattung"), Some(&Value::text("LI")));
}

#[test]
fn attached_lookups_append_lookup_fields() {
    let options = WfsOptions {
        compact: true,
        attach_lookups: true,
    };
    let mut source = trees(options);
    let columns = source.columns().unwrap();
    assert!(columns.contains("gattung.langtext"));
    assert!(columns.contains("gattung.kurztext"));
    assert!(!columns.contains("gattung.href"));

    let records = read_all(&mut source);
    assert_eq!(records[0].get("gattung.langtext"), Some(&Value::text("Ahorn")));
    assert_eq!(records[0].get("gattung.kurztext"), Some(&Value::text("Ah")));
    assert_eq!(records[1].get("gattung.langtext"), Some(&Value::text("Linde")));
    assert!(!records[1].contains("gattung.kurztext"));

    let service = source.client().service();
    assert_eq!(service.calls("GetFeature", "Itebgattung"), 1);
    assert_eq!(service.calls("DescribeFeatureType", "Itebgattung"), 1);
}

#[test]
fn reset_rewinds_without_refetching() {
    let mut source = trees(WfsOptions::default());
    let (_, first) = head(&mut source, 1).unwrap();
    assert_eq!(first.len(), 1);

    let all = read_all(&mut source);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], first[0]);

    source.reset().unwrap();
    assert_eq!(read_all(&mut source).len(), 2);
    assert_eq!(source.client().service().calls("GetFeature", "Oteinzelbaum"), 1);
}

#[test]
fn filter_is_sent_with_get_feature() {
    let mut source = trees(WfsOptions::default());
    source.set_filter(r#"GROESSER(krone, "10")"#).unwrap();
    read_all(&mut source);

    let filters = source.client().service().filters();
    let sent = filters.last().cloned().flatten().unwrap();
    assert!(sent.contains("<ogc:PropertyIsGreaterThan><ogc:PropertyName>krone</ogc:PropertyName>"));
}

#[test]
fn feature_type_is_set_once() {
    let mut source = WfsSource::new(WfsClient::new(CannedService::trees()), WfsOptions::default());
    assert!(matches!(
        source.columns().unwrap_err(),
        WfsError::MissingFeatureType
    ));
    assert!(matches!(
        source.set_filter(r#"GLEICH(krone, "1")"#).unwrap_err(),
        WfsError::MissingFeatureType
    ));

    source.set_feature_type("Oteinzelbaum").unwrap();
    match source.set_feature_type("Itebgattung").unwrap_err() {
        WfsError::FeatureTypeAlreadySet(current) => assert_eq!(current, "Oteinzelbaum"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(source.feature_type().unwrap(), "Oteinzelbaum");
}

fn import_source(records: Vec<Record>) -> MemorySource {
    let columns: Columns = ["objektId", "krone", "gattung", "bemerkung", "hoehe"]
        .into_iter()
        .map(Column::text)
        .collect();
    MemorySource::new(columns, records)
}

#[test]
fn write_inserts_schema_fields_in_order() {
    let record: Record = [
        ("hoehe", Value::text("9")),
        ("bemerkung", Value::text("Linde & Ahorn")),
        ("gattung", Value::text("LI")),
        ("krone", Value::Integer(7)),
        ("objektId", Value::text("B-9")),
    ]
    .into_iter()
    .collect();
    let mut input = import_source(vec![record]);

    let mut target = trees(WfsOptions::default());
    let summary = target.write(&mut input).unwrap();
    assert_eq!(summary.records, 1);
    assert!(summary.success);

    let posted = target.client().service().posted();
    assert_eq!(posted.len(), 1);
    let body = &posted[0];
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><wfs:Transaction service="WFS" version="1.0.0" xmlns="http://xml.novasib.de""#));

    let start = body.find("<wfs:Insert>").unwrap();
    let end = body.find("</wfs:Insert>").unwrap();
    insta::assert_snapshot!(
        &body[start..end + "</wfs:Insert>".len()],
        @r##"<wfs:Insert><Oteinzelbaum><krone>7</krone><gattung xlink:href="#g2" typeName="Itebgattung" luk="LI"/><bemerkung>Linde &amp; Ahorn</bemerkung></Oteinzelbaum></wfs:Insert>"##
    );
}

#[test]
fn write_rejects_unknown_lookup_codes() {
    let record: Record = [("gattung", "ZZ")].into_iter().collect();
    let mut input = import_source(vec![record]);

    let mut target = trees(WfsOptions::default());
    let err = target.write(&mut input).unwrap_err();
    assert!(matches!(err, WfsError::LookupNotFound { ref key, .. } if key == "ZZ"));
    assert!(target.client().service().posted().is_empty());
}
