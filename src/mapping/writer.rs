//! Write-direction field mapper
//!
//! Converts records of `T` into rows using the same field mapping as reads.
//! Failures abort immediately; writes have no error aggregation.

use super::schema::{FieldMapping, TableRecord};
use crate::error::{MappingError, Result};
use crate::models::{Cell, Row};

/// Maps records of `T` to rows
#[derive(Debug)]
pub struct WriteMapper<'m, T> {
    mapping: &'m FieldMapping<T>,
}

impl<'m, T: TableRecord> WriteMapper<'m, T> {
    pub fn new(mapping: &'m FieldMapping<T>) -> Self {
        Self { mapping }
    }

    /// Column names in mapping order, for the optional header line
    pub fn names_row(&self) -> Row {
        self.mapping
            .fields()
            .iter()
            .map(|field| Cell::new(field.name.clone(), 1))
            .collect()
    }

    /// Format one record; `line_number` is the output line the row will occupy
    pub fn to_row(&self, record: &T, line_number: usize) -> Result<Row> {
        let mut row = Row::with_capacity(self.mapping.len());
        for field in self.mapping.fields() {
            let value = field.render(record).map_err(|kind| {
                MappingError::conversion(self.mapping.type_name(), line_number, &field.name, kind)
            })?;
            row.push(Cell::new(value, line_number));
        }
        Ok(row)
    }
}
