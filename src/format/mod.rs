//! Tabular row source/sink abstraction
//!
//! The mapping layer never touches bytes. A [`TableFormat`] turns an opened
//! reader or writer into a [`RowSource`] or [`RowSink`], and everything above
//! it works in terms of [`Row`]s. [`CsvFormat`] is the bundled implementation.

pub mod csv;

pub use self::csv::CsvFormat;

use crate::error::Result;
use crate::models::Row;
use std::io::{Read, Write};

/// Produces physical rows from an opened resource
pub trait RowSource {
    /// Clear `row` and refill it with the next physical row.
    ///
    /// Returns `false` at end of data, leaving `row` empty.
    fn read_row(&mut self, row: &mut Row) -> Result<bool>;

    /// Release the underlying resource
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Accepts formatted rows for an opened resource
pub trait RowSink {
    fn write_row(&mut self, row: &Row) -> Result<()>;

    /// Flush and close any structural framing
    fn finalize(&mut self) -> Result<()>;
}

/// A tabular encoding able to read and write rows
pub trait TableFormat {
    fn open_source<'r>(&self, input: Box<dyn Read + 'r>, name: &str) -> Result<Box<dyn RowSource + 'r>>;

    fn open_sink<'w>(&self, output: Box<dyn Write + 'w>, name: &str) -> Result<Box<dyn RowSink + 'w>>;
}
