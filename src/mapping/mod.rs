//! Bidirectional mapping between records and rows
//!
//! ## Architecture
//!
//! - [`schema`] - Record declarations and validated field mapping metadata
//! - [`field_types`] - Typed parse/format rules for field values
//! - [`reader`] - Row to record conversion with lenient failure handling
//! - [`writer`] - Record to row conversion
//!
//! ## Usage
//!
//! ```rust
//! use tablemap::{table_column, Column, ErrorAggregator, FileDescription, TableRecord};
//! use tablemap::mapping::{FieldMapping, ReadMapper, WriteMapper};
//! use tablemap::models::{Cell, Row};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Station {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl TableRecord for Station {
//!     fn columns() -> Vec<Column<Self>> {
//!         vec![table_column!(Station, id), table_column!(Station, name)]
//!     }
//! }
//!
//! # fn main() -> tablemap::Result<()> {
//! let description = FileDescription::default();
//! let mapping = FieldMapping::<Station>::build(&description)?;
//!
//! let row: Row = ["1330", "Clawton"].iter().map(|v| Cell::new(*v, 1)).collect();
//! let mut errors = ErrorAggregator::new("Station", "inline", description.maximum_nbr_exceptions);
//! let station = ReadMapper::new(&mapping, &description, "inline").to_object(&row, &mut errors)?;
//! assert_eq!(station, Station { id: 1330, name: "Clawton".to_string() });
//!
//! let written = WriteMapper::new(&mapping).to_row(&station, 1)?;
//! assert_eq!(written.values(), vec!["1330", "Clawton"]);
//! # Ok(())
//! # }
//! ```

pub mod field_types;
pub mod reader;
pub mod schema;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use field_types::{ConversionRule, FieldType};
pub use reader::ReadMapper;
pub use schema::{Column, FieldInfo, FieldMapping, TableRecord};
pub use writer::WriteMapper;
