//! Row failure collection for lenient reads.
//!
//! An [`ErrorAggregator`] lives for exactly one read pass. Conversion failures
//! are added as they happen; the aggregate is raised either immediately when
//! the configured [`ErrorLimit`] is exceeded, or once at the end of the pass.

use crate::config::ErrorLimit;
use crate::error::ConversionErrorKind;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// A conversion failure attributed to a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// Line the failing cell (or row) was read from
    pub line_number: usize,
    /// Column name of the failing field, when the failure concerns one field
    pub column: Option<String>,
    pub kind: ConversionErrorKind,
}

impl RowFailure {
    pub fn new(line_number: usize, column: Option<String>, kind: ConversionErrorKind) -> Self {
        Self {
            line_number,
            column,
            kind,
        }
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "line {}, column '{}': {}", self.line_number, column, self.kind),
            None => write!(f, "line {}: {}", self.line_number, self.kind),
        }
    }
}

/// All row failures collected while reading one source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} conversion error(s) while reading {type_name} from {source_name}: {}", .failures.len(), summarize(.failures))]
pub struct AggregatedError {
    pub type_name: String,
    pub source_name: String,
    /// Failures in the order the rows were read
    pub failures: Vec<RowFailure>,
}

impl AggregatedError {
    /// Line numbers of the collected failures, in row order
    pub fn line_numbers(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.line_number).collect()
    }
}

fn summarize(failures: &[RowFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Lifecycle of an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// No failures recorded
    Empty,
    /// Failures recorded, limit not exceeded
    Collecting,
    /// Limit exceeded and the aggregate already raised
    Capped,
    /// End-of-pass check done
    Finished,
}

/// Collects row failures for one read pass
#[derive(Debug)]
pub struct ErrorAggregator {
    type_name: String,
    source_name: String,
    limit: ErrorLimit,
    failures: Vec<RowFailure>,
    state: AggregatorState,
}

impl ErrorAggregator {
    pub fn new(type_name: impl Into<String>, source_name: impl Into<String>, limit: ErrorLimit) -> Self {
        Self {
            type_name: type_name.into(),
            source_name: source_name.into(),
            limit,
            failures: Vec::new(),
            state: AggregatorState::Empty,
        }
    }

    /// Record a failure; returns the aggregate when the limit is exceeded
    pub fn add(&mut self, failure: RowFailure) -> Result<(), AggregatedError> {
        debug!("Row failure in {}: {}", self.source_name, failure);
        self.failures.push(failure);

        if self.state == AggregatorState::Empty {
            self.state = AggregatorState::Collecting;
        }

        if self.state == AggregatorState::Collecting && self.limit.is_exceeded_by(self.failures.len()) {
            self.state = AggregatorState::Capped;
            warn!(
                "Error limit {:?} exceeded reading {} from {} ({} failures)",
                self.limit,
                self.type_name,
                self.source_name,
                self.failures.len()
            );
            return Err(self.to_error());
        }
        Ok(())
    }

    /// End-of-pass check: raise the stored failures once, if any.
    ///
    /// Does nothing when the aggregate was already raised by [`add`](Self::add).
    pub fn finish(&mut self) -> Result<(), AggregatedError> {
        let previous = self.state;
        if previous != AggregatorState::Capped {
            self.state = AggregatorState::Finished;
        }

        match previous {
            AggregatorState::Collecting => {
                warn!(
                    "Read of {} from {} completed with {} conversion failure(s)",
                    self.type_name,
                    self.source_name,
                    self.failures.len()
                );
                Err(self.to_error())
            }
            _ => Ok(()),
        }
    }

    /// Hand over failures that were collected but never raised.
    ///
    /// Marks the aggregator finished, so the failures are reported only once.
    pub fn take_unreported(&mut self) -> Option<AggregatedError> {
        if self.state != AggregatorState::Collecting {
            return None;
        }
        self.state = AggregatorState::Finished;
        Some(self.to_error())
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    /// Failures collected so far
    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when failures were collected but never raised
    pub fn has_unreported(&self) -> bool {
        self.state == AggregatorState::Collecting
    }

    fn to_error(&self) -> AggregatedError {
        AggregatedError {
            type_name: self.type_name.clone(),
            source_name: self.source_name.clone(),
            failures: self.failures.clone(),
        }
    }
}
