//! Streaming read and write orchestration
//!
//! [`TableContext`] is the entry point. Reads are lazy: [`TableContext::read`]
//! validates the record mapping and returns a [`TableReader`] without touching
//! the source; each [`TableReader::iter`] call is one pass that opens the
//! source on its first item and releases it when the pass ends or is dropped.
//! Writes are eager and run to completion inside [`TableContext::write`].
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use tablemap::{table_column, Column, FileDescription, TableContext, TableRecord, TableSink, TableSource};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Reading {
//!     station: String,
//!     rainfall: f64,
//! }
//!
//! impl TableRecord for Reading {
//!     fn columns() -> Vec<Column<Self>> {
//!         vec![table_column!(Reading, station), table_column!(Reading, rainfall).format("F1")]
//!     }
//! }
//!
//! # fn main() -> tablemap::Result<()> {
//! let context = TableContext::csv();
//! let description = FileDescription::new().with_column_names(true);
//! let readings = vec![Reading { station: "Clawton".into(), rainfall: 2.5 }];
//!
//! let mut buffer = Vec::new();
//! context.write(&readings, TableSink::stream(&mut buffer), &description)?;
//! assert_eq!(String::from_utf8_lossy(&buffer), "station,rainfall\nClawton,2.5\n");
//!
//! let mut reader = context.read::<Reading>(TableSource::seekable(Cursor::new(buffer)), &description)?;
//! let back = reader.iter().collect::<tablemap::Result<Vec<_>>>()?;
//! assert_eq!(back, readings);
//! # Ok(())
//! # }
//! ```

pub mod records;
pub mod source;

#[cfg(test)]
pub mod tests;

pub use records::{RawRows, Records, RowDecoder};
pub use source::{ReadSeek, ResourceGuard, TableSink, TableSource};

use crate::aggregate::ErrorAggregator;
use crate::config::FileDescription;
use crate::error::Result;
use crate::format::{CsvFormat, TableFormat};
use crate::mapping::{FieldMapping, ReadMapper, TableRecord, WriteMapper};
use records::Opener;
use tracing::{debug, info};

/// Entry point for reading and writing records through a [`TableFormat`]
pub struct TableContext {
    format: Box<dyn TableFormat + Send + Sync>,
}

impl TableContext {
    pub fn new(format: impl TableFormat + Send + Sync + 'static) -> Self {
        Self {
            format: Box::new(format),
        }
    }

    /// Context using comma-separated values
    pub fn csv() -> Self {
        Self::new(CsvFormat::default())
    }

    /// Prepare a lazy read of records of `T`.
    ///
    /// The mapping for `T` is built and the description validated here, so
    /// schema and configuration errors surface before the source is touched.
    pub fn read<'a, T: TableRecord>(
        &'a self,
        source: TableSource<'a>,
        description: &FileDescription,
    ) -> Result<TableReader<'a, T>> {
        description.validate()?;
        let mapping = FieldMapping::<T>::build(description)?;
        debug!("Prepared read of {} from {}", mapping.type_name(), source.name());

        Ok(TableReader {
            format: self.format.as_ref(),
            source,
            description: description.clone(),
            mapping,
        })
    }

    /// Prepare a lazy read of raw rows
    pub fn read_rows<'a>(
        &'a self,
        source: TableSource<'a>,
        description: &FileDescription,
    ) -> Result<RowReader<'a>> {
        description.validate()?;
        Ok(RowReader {
            format: self.format.as_ref(),
            source,
            description: description.clone(),
        })
    }

    /// Write every value as one row, after the names row when configured.
    ///
    /// Returns the number of records written. The first conversion failure
    /// aborts the write.
    pub fn write<'v, T: TableRecord>(
        &self,
        values: impl IntoIterator<Item = &'v T>,
        sink: TableSink<'_>,
        description: &FileDescription,
    ) -> Result<usize> {
        description.validate()?;
        let mapping = FieldMapping::<T>::build(description)?;
        let mapper = WriteMapper::new(&mapping);

        let name = sink.name();
        let output = sink.open()?;
        let mut rows = self.format.open_sink(output, &name)?;

        let mut line_number = 0;
        if description.first_line_has_column_names {
            rows.write_row(&mapper.names_row())?;
            line_number += 1;
        }

        let mut written = 0;
        for value in values {
            line_number += 1;
            let row = mapper.to_row(value, line_number)?;
            rows.write_row(&row)?;
            written += 1;
        }

        rows.finalize()?;
        info!("Wrote {} {} records to {}", written, mapping.type_name(), name);
        Ok(written)
    }
}

impl Default for TableContext {
    fn default() -> Self {
        Self::csv()
    }
}

/// A prepared, re-iterable read of records of `T`
pub struct TableReader<'a, T> {
    format: &'a (dyn TableFormat + Send + Sync),
    source: TableSource<'a>,
    description: FileDescription,
    mapping: FieldMapping<T>,
}

impl<'a, T: TableRecord> TableReader<'a, T> {
    /// Start a new pass over the source
    pub fn iter(&mut self) -> Records<'_, ReadMapper<'_, T>> {
        let name = self.source.name();
        let opener = opener(self.format, &mut self.source, name.clone());

        let mapping = &self.mapping;
        let description = &self.description;
        let errors = ErrorAggregator::new(
            mapping.type_name(),
            name.clone(),
            description.maximum_nbr_exceptions,
        );
        let decoder = ReadMapper::new(mapping, description, name.clone());
        Records::new(opener, name, decoder, errors, description.first_line_has_column_names)
    }

    pub fn mapping(&self) -> &FieldMapping<T> {
        &self.mapping
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }
}

impl<'r, 'a, T: TableRecord> IntoIterator for &'r mut TableReader<'a, T> {
    type Item = Result<T>;
    type IntoIter = Records<'r, ReadMapper<'r, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A prepared, re-iterable read of raw rows
pub struct RowReader<'a> {
    format: &'a (dyn TableFormat + Send + Sync),
    source: TableSource<'a>,
    description: FileDescription,
}

impl<'a> RowReader<'a> {
    /// Start a new pass over the source
    pub fn iter(&mut self) -> Records<'_, RawRows> {
        let name = self.source.name();
        let opener = opener(self.format, &mut self.source, name.clone());
        let errors = ErrorAggregator::new("Row", name.clone(), self.description.maximum_nbr_exceptions);
        Records::new(
            opener,
            name,
            RawRows,
            errors,
            self.description.first_line_has_column_names,
        )
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }
}

/// Defer opening `source` until the pass asks for its first row
fn opener<'r, 'a: 'r>(
    format: &'r (dyn TableFormat + Send + Sync),
    source: &'r mut TableSource<'a>,
    name: String,
) -> Opener<'r> {
    Box::new(move || {
        // Take the borrow by value so the closure is FnOnce
        let source = source;
        let input = source.open()?;
        format.open_source(input, &name)
    })
}
