//! CSV row source and sink built on the `csv` crate

use super::{RowSink, RowSource, TableFormat};
use crate::error::{MappingError, Result};
use crate::models::{Cell, Row};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};
use tracing::debug;

/// Delimited text format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl CsvFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

impl TableFormat for CsvFormat {
    fn open_source<'r>(&self, input: Box<dyn Read + 'r>, name: &str) -> Result<Box<dyn RowSource + 'r>> {
        // Names are handled by the mapper, so the csv reader sees every row as data
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .from_reader(input);

        Ok(Box::new(CsvRowSource {
            reader,
            record: StringRecord::new(),
            name: name.to_string(),
            rows_read: 0,
        }))
    }

    fn open_sink<'w>(&self, output: Box<dyn Write + 'w>, name: &str) -> Result<Box<dyn RowSink + 'w>> {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .from_writer(output);

        Ok(Box::new(CsvRowSink {
            writer,
            name: name.to_string(),
        }))
    }
}

struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    name: String,
    rows_read: usize,
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self, row: &mut Row) -> Result<bool> {
        row.clear();

        let more = self.reader.read_record(&mut self.record).map_err(|e| {
            MappingError::csv_parsing(
                &self.name,
                format!("Failed to read row after line {}", self.rows_read),
                Some(e),
            )
        })?;
        if !more {
            return Ok(false);
        }

        self.rows_read += 1;
        let line_number = self
            .record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(self.rows_read);

        for field in self.record.iter() {
            row.push(Cell::new(field, line_number));
        }
        Ok(true)
    }

    fn close(&mut self) -> Result<()> {
        debug!("Closing CSV source {} after {} rows", self.name, self.rows_read);
        Ok(())
    }
}

struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
    name: String,
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.writer
            .write_record(row.iter().map(|cell| cell.value().unwrap_or_default()))
            .map_err(|e| MappingError::csv_parsing(&self.name, "Failed to write row", Some(e)))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| MappingError::io(&self.name, e))
    }
}
