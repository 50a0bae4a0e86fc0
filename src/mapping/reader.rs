//! Read-direction field mapper
//!
//! Converts rows into records of `T`. Conversion failures never abort a row:
//! they are handed to the pass's [`ErrorAggregator`] with the line number and
//! column attached, and the field keeps its default value.

use super::schema::{FieldMapping, TableRecord};
use crate::aggregate::{ErrorAggregator, RowFailure};
use crate::config::FileDescription;
use crate::error::{ConversionErrorKind, MappingError, Result};
use crate::models::Row;
use std::borrow::Cow;
use tracing::debug;

/// Maps rows to records of `T` for one read pass
#[derive(Debug)]
pub struct ReadMapper<'m, T> {
    mapping: &'m FieldMapping<T>,
    enforce_column_attribute: bool,
    source_name: String,
    /// Physical column index of each field, in field order
    field_columns: Vec<Option<usize>>,
    names_resolved: bool,
}

impl<'m, T: TableRecord> ReadMapper<'m, T> {
    pub fn new(
        mapping: &'m FieldMapping<T>,
        description: &FileDescription,
        source_name: impl Into<String>,
    ) -> Self {
        // Without names, field N reads physical column N
        let field_columns = (0..mapping.len()).map(Some).collect();
        Self {
            mapping,
            enforce_column_attribute: description.enforce_column_attribute,
            source_name: source_name.into(),
            field_columns,
            names_resolved: false,
        }
    }

    /// Resolve field positions from a header row.
    ///
    /// Header columns that match no field are ignored. Fields without a
    /// matching column keep their default value, except that a required field
    /// missing under enforced declarations is an error.
    pub fn resolve_names(&mut self, header: &Row) -> Result<()> {
        let mut field_columns = vec![None; self.mapping.len()];

        for (column, cell) in header.iter().enumerate() {
            let name = cell.value().unwrap_or_default().trim();
            match self.mapping.index_of(name) {
                Some(field) if field_columns[field].is_none() => field_columns[field] = Some(column),
                Some(_) => debug!("Duplicate header column '{}' ignored in {}", name, self.source_name),
                None => debug!("Header column '{}' has no field in {}", name, self.mapping.type_name()),
            }
        }

        if self.enforce_column_attribute {
            let missing = self
                .mapping
                .fields()
                .iter()
                .zip(&field_columns)
                .find(|(field, column)| field.required && column.is_none());
            if let Some((field, _)) = missing {
                return Err(MappingError::unknown_column(
                    &field.name,
                    self.mapping.type_name(),
                    &self.source_name,
                ));
            }
        }

        debug!(
            "Resolved {} of {} fields from header of {}",
            field_columns.iter().filter(|c| c.is_some()).count(),
            self.mapping.len(),
            self.source_name
        );
        self.field_columns = field_columns;
        self.names_resolved = true;
        Ok(())
    }

    /// Convert a row into a record.
    ///
    /// Returns `Err` only when a failure pushes the aggregator past its limit.
    pub fn to_object(&self, row: &Row, errors: &mut ErrorAggregator) -> Result<T> {
        let mut record = T::default();
        let row_line = row.line_number().unwrap_or_default();

        if !self.names_resolved && row.len() > self.mapping.len() {
            errors.add(RowFailure::new(
                row_line,
                None,
                ConversionErrorKind::TooManyDataFields {
                    found: row.len(),
                    expected: self.mapping.len(),
                },
            ))?;
        }

        for (field, column) in self.mapping.fields().iter().zip(self.field_columns.iter().copied()) {
            let cell = column.and_then(|c| row.get(c));

            let raw = match cell {
                Some(cell) if !cell.is_blank() => cell.value().unwrap_or_default(),
                _ => {
                    if field.required {
                        let line = cell.map_or(row_line, |c| c.line_number());
                        errors.add(RowFailure::new(
                            line,
                            Some(field.name.clone()),
                            ConversionErrorKind::MissingRequiredField,
                        ))?;
                    }
                    continue;
                }
            };

            let value = truncate(raw, field.max_length);
            if let Err(kind) = field.assign(&mut record, &value) {
                let line = cell.map_or(row_line, |c| c.line_number());
                errors.add(RowFailure::new(line, Some(field.name.clone()), kind))?;
            }
        }

        Ok(record)
    }
}

/// Apply a fixed column width.
///
/// Values longer than `limit` characters keep only their first `limit - 1`
/// characters (legacy fixed-width behaviour, kept as is).
pub fn truncate(value: &str, limit: usize) -> Cow<'_, str> {
    if limit == 0 || value.chars().count() <= limit {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.chars().take(limit - 1).collect())
}
