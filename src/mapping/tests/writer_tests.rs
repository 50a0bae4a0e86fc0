//! Tests for record to row conversion

use super::*;
use crate::error::{ConversionErrorKind, MappingError};
use crate::mapping::{FieldMapping, WriteMapper};

#[test]
fn test_names_row_matches_field_order() {
    let mapping = FieldMapping::<Product>::build(&named_description()).unwrap();
    let mapper = WriteMapper::new(&mapping);

    let names = mapper.names_row();
    let values = mapper.to_row(&Product::sample(), 2).unwrap();

    assert_eq!(names.len(), values.len());
    assert_eq!(
        names.values(),
        vec!["name", "price", "StartDate", "Available", "on_sale", "LaunchTime", "description"]
    );
    assert_eq!(names.line_number(), Some(1));
}

#[test]
fn test_to_row_formats_each_field() {
    let mapping = FieldMapping::<Product>::build(&description()).unwrap();
    let row = WriteMapper::new(&mapping).to_row(&Product::sample(), 5).unwrap();

    assert_eq!(
        row.values(),
        vec!["Desk lamp", "24.50", "11/30/2008", "12", "true", "", "Adjustable, warm light"]
    );
    assert_eq!(row.line_number(), Some(5));
}

#[test]
fn test_to_row_uses_file_culture() {
    let dutch = description().with_culture("nl-NL");
    let mapping = FieldMapping::<Product>::build(&dutch).unwrap();
    let row = WriteMapper::new(&mapping).to_row(&Product::sample(), 1).unwrap();

    assert_eq!(row[1].value(), Some("24,50"));
    assert_eq!(row[2].value(), Some("30-11-2008"));
}

#[test]
fn test_write_does_not_truncate() {
    let mapping = FieldMapping::<Product>::build(&description()).unwrap();
    let product = Product {
        name: "Reading lamp, brass".to_string(),
        ..Product::sample()
    };
    let row = WriteMapper::new(&mapping).to_row(&product, 1).unwrap();

    assert_eq!(row[0].value(), Some("Reading lamp, brass"));
}

#[derive(Debug, Default)]
struct Invoice {
    total: f64,
}

impl TableRecord for Invoice {
    fn columns() -> Vec<Column<Self>> {
        vec![table_column!(Invoice, total).format("D4")]
    }
}

#[test]
fn test_format_failure_aborts_with_record_and_column() {
    let mapping = FieldMapping::<Invoice>::build(&description()).unwrap();
    let error = WriteMapper::new(&mapping)
        .to_row(&Invoice { total: 12.0 }, 3)
        .unwrap_err();

    match error {
        MappingError::Conversion {
            type_name,
            record,
            column,
            source,
        } => {
            assert_eq!(type_name, "Invoice");
            assert_eq!(record, 3);
            assert_eq!(column, "total");
            assert!(matches!(source, ConversionErrorKind::UnsupportedFormat { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}
