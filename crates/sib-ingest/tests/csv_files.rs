use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use sib_ingest::{CsvSource, CsvTarget, IngestError};
use sib_model::{
    Column, ColumnType, Columns, DataSource, DataTarget, MemorySource, Record, RecordTransform,
    Transformed, Value,
};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_header_and_skips_empty_cells() {
    let dir = TempDir::new().unwrap();
    let path = temp_file(
        &dir,
        "baeume.csv",
        "\"vnk\";\"krone\";\"bemerkung\"\n\"123405678\";12;\n\"223405678\";;\"alt; hohl\"\n",
    );

    let mut source = CsvSource::open(&path).unwrap();
    let columns = source.columns().unwrap();
    assert_eq!(columns.names().collect::<Vec<_>>(), ["vnk", "krone", "bemerkung"]);
    assert!(columns.iter().all(|c| c.ty == ColumnType::Text));

    let first = source.next_record().unwrap().unwrap();
    assert_eq!(first.get("vnk"), Some(&Value::text("123405678")));
    assert_eq!(first.get("krone"), Some(&Value::text("12")));
    assert!(!first.contains("bemerkung"));

    let second = source.next_record().unwrap().unwrap();
    assert!(!second.contains("krone"));
    assert_eq!(second.get("bemerkung"), Some(&Value::text("alt; hohl")));

    assert!(source.next_record().unwrap().is_none());
}

#[test]
fn reset_starts_over() {
    let dir = TempDir::new().unwrap();
    let path = temp_file(&dir, "a.csv", "a;b\n1;2\n3;4\n");

    let mut source = CsvSource::open(&path).unwrap();
    source.next_record().unwrap();
    source.next_record().unwrap();
    source.reset().unwrap();

    let first = source.next_record().unwrap().unwrap();
    assert_eq!(first.get("a"), Some(&Value::text("1")));
}

#[test]
fn empty_file_has_no_header() {
    let dir = TempDir::new().unwrap();
    let path = temp_file(&dir, "leer.csv", "");
    assert!(matches!(
        CsvSource::open(&path).unwrap_err(),
        IngestError::MissingHeader { .. }
    ));
}

#[test]
fn missing_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let err = CsvSource::open(dir.path().join("fehlt.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
}

#[test]
fn writes_quoted_text_and_decimal_commas() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.csv");

    let columns: Columns = [
        Column::text("gattung"),
        Column::new("krone", ColumnType::Integer),
        Column::new("hoehe", ColumnType::Float),
        Column::new("pflanzdatum", ColumnType::DateTime),
    ]
    .into_iter()
    .collect();
    let date = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
    let records = vec![
        [
            ("gattung", Value::text("AR1")),
            ("krone", Value::Integer(12)),
            ("hoehe", Value::Float(7.5)),
            ("pflanzdatum", Value::Date(date)),
        ]
        .into_iter()
        .collect::<Record>(),
        [("krone", Value::Integer(3))].into_iter().collect(),
    ];
    let mut input = MemorySource::new(columns, records);

    let summary = CsvTarget::new(&path).write(&mut input).unwrap();
    assert_eq!(summary.records, 2);
    assert!(summary.success);

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "\"gattung\";\"krone\";\"hoehe\";\"pflanzdatum\"\n\
         \"AR1\";12;7,5;\"2019-04-01\"\n\
         ;3;;\n"
    );
}

#[test]
fn transformed_csv_splits_network_nodes() {
    let dir = TempDir::new().unwrap();
    let path = temp_file(
        &dir,
        "abschnitte.csv",
        "\"von\";\"nach\";\"art\"\n\"123405678Z\";\"123405679\";\"L\"\n",
    );

    let transform = RecordTransform::new()
        .rename("art", "baumart")
        .split_nodes(Some("von".to_string()), Some("nach".to_string()));
    let mut source = Transformed::new(CsvSource::open(&path).unwrap(), transform);

    let columns = source.columns().unwrap();
    assert!(columns.contains("baumart"));
    assert!(columns.contains("vtkNummer"));
    assert!(columns.contains("nzusatz"));

    let record = source.next_record().unwrap().unwrap();
    assert_eq!(record.get("baumart"), Some(&Value::text("L")));
    assert_eq!(record.get("vtkNummer"), Some(&Value::Integer(1234)));
    assert_eq!(record.get("vnkLfd"), Some(&Value::Integer(5678)));
    assert_eq!(record.get("vzusatz"), Some(&Value::text("Z")));
    assert_eq!(record.get("nnkLfd"), Some(&Value::Integer(5679)));
    assert_eq!(record.get("nzusatz"), Some(&Value::text("O")));
}
