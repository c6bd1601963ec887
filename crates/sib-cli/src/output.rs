//! Terminal tables for records, schemas and lookup records.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};

use sib_model::{Columns, Record};
use sib_wfs::{FeatureSchema, FeatureTypeInfo, LookupRecord};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

pub fn feature_types_table(types: &[FeatureTypeInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Feature type", "Title"]);
    apply_table_style(&mut table);
    for info in types {
        table.add_row(vec![info.name.as_str(), info.title.as_str()]);
    }
    table
}

pub fn schema_table(schema: &FeatureSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Type", "Lookup", "Read-only", "Description"]);
    apply_table_style(&mut table);
    for field in schema {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.type_string().unwrap_or_default()),
            Cell::new(field.lookup_type.as_deref().unwrap_or_default()),
            Cell::new(if field.read_only { "yes" } else { "" }),
            Cell::new(field.documentation.as_deref().unwrap_or_default()),
        ]);
    }
    table
}

/// One row per record, one column per source column; absent values are blank.
pub fn records_table(columns: &Columns, records: &[Record]) -> Table {
    let mut table = Table::new();
    table.set_header(columns.names().collect::<Vec<_>>());
    apply_table_style(&mut table);
    for record in records {
        table.add_row(
            columns
                .names()
                .map(|name| record.get(name).map(ToString::to_string).unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub fn lookup_table(record: &LookupRecord) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    apply_table_style(&mut table);
    table.add_row(vec!["luk", record.code.as_str()]);
    table.add_row(vec!["href", record.reference.as_str()]);
    for (name, value) in &record.fields {
        table.add_row(vec![name.as_str(), value.as_deref().unwrap_or_default()]);
    }
    table
}
