//! Error handling for record mapping operations.
//!
//! Provides the failure surface of the crate: schema problems detected before
//! any I/O, resource failures, per-cell conversion causes, and the aggregate
//! failure that bundles row-level errors collected during a read.

use crate::aggregate::AggregatedError;
use thiserror::Error;

/// Cause of a single cell conversion failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionErrorKind {
    #[error("'{value}' is not a valid {kind}")]
    InvalidNumber { value: String, kind: &'static str },

    #[error("'{value}' is not a valid boolean (expected true or false)")]
    InvalidBoolean { value: String },

    #[error("'{value}' is not a single character")]
    InvalidChar { value: String },

    #[error("'{value}' does not match any accepted {kind} pattern ({patterns})")]
    InvalidDateTime {
        value: String,
        kind: &'static str,
        patterns: String,
    },

    #[error("Format '{format}' is not supported for {kind} values")]
    UnsupportedFormat { format: String, kind: &'static str },

    #[error("Required field has no value")]
    MissingRequiredField,

    #[error("Row has {found} data fields but only {expected} are mapped")]
    TooManyDataFields { found: usize, expected: usize },
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Invalid mapping for record type {type_name}: {reason}")]
    Schema { type_name: String, reason: String },

    #[error("Required column '{column}' of {type_name} is missing from the header row of {source_name}")]
    UnknownColumn {
        column: String,
        type_name: String,
        source_name: String,
    },

    #[error("Stream {source_name} cannot be rewound for another pass")]
    NonSeekableStream { source_name: String },

    #[error(transparent)]
    Aggregated(#[from] AggregatedError),

    #[error("Failed to write {type_name} record #{record} column '{column}': {source}")]
    Conversion {
        type_name: String,
        record: usize,
        column: String,
        #[source]
        source: ConversionErrorKind,
    },

    #[error("I/O error on {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl MappingError {
    /// Create a schema error for a record type
    pub fn schema(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(
        column: impl Into<String>,
        type_name: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            type_name: type_name.into(),
            source_name: source_name.into(),
        }
    }

    /// Create a non-seekable stream error
    pub fn non_seekable(source_name: impl Into<String>) -> Self {
        Self::NonSeekableStream {
            source_name: source_name.into(),
        }
    }

    /// Create a write-side conversion error
    pub fn conversion(
        type_name: impl Into<String>,
        record: usize,
        column: impl Into<String>,
        source: ConversionErrorKind,
    ) -> Self {
        Self::Conversion {
            type_name: type_name.into(),
            record,
            column: column.into(),
            source,
        }
    }

    /// Create an I/O error with the resource it happened on
    pub fn io(resource: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            resource: resource.into(),
            source,
        }
    }

    /// Create a CSV parsing error
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The aggregate failure carried by this error, if any
    pub fn as_aggregated(&self) -> Option<&AggregatedError> {
        match self {
            Self::Aggregated(aggregated) => Some(aggregated),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;
