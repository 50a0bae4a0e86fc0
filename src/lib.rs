//! Tablemap Library
//!
//! A Rust library for mapping typed records to and from tabular rows, with
//! lazy, fault-tolerant streaming reads.
//!
//! This library provides tools for:
//! - Declaring how the fields of a record type map to columns
//! - Converting cells with culture-aware number and date rules
//! - Reading records lazily, one pass per iteration, with guaranteed resource release
//! - Collecting row conversion failures into a single aggregated error
//! - Writing records, with an optional column names line, to files or streams

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod culture;
pub mod error;
pub mod format;
pub mod mapping;
pub mod models;
pub mod stream;

// Re-export commonly used types
pub use aggregate::{AggregatedError, AggregatorState, ErrorAggregator, RowFailure};
pub use config::{ErrorLimit, FileDescription};
pub use culture::Culture;
pub use error::{ConversionErrorKind, MappingError, Result};
pub use format::{CsvFormat, RowSink, RowSource, TableFormat};
pub use mapping::{Column, ConversionRule, FieldMapping, FieldType, TableRecord};
pub use models::{Cell, Row};
pub use stream::{Records, RowReader, TableContext, TableReader, TableSink, TableSource};
