//! Lazy, single-pass record iteration over a tabular source.
//!
//! A [`Records`] value owns everything one pass needs: the deferred opener,
//! the [`ResourceGuard`] once the source is open, the row decoder and the
//! pass's [`ErrorAggregator`]. Nothing is opened until the first call to
//! `next`, and the resource is released exactly once however the pass ends.

use super::source::ResourceGuard;
use crate::aggregate::{AggregatedError, ErrorAggregator, RowFailure};
use crate::error::{MappingError, Result};
use crate::format::RowSource;
use crate::mapping::{ReadMapper, TableRecord};
use crate::models::Row;
use tracing::{debug, info, warn};

/// Turns physical rows into output items for one pass
pub trait RowDecoder {
    type Output;

    /// Consume the header row
    fn read_names(&mut self, header: &Row) -> Result<()>;

    /// Convert a data row, recording failures in `errors`
    fn decode(&mut self, row: &Row, errors: &mut ErrorAggregator) -> Result<Self::Output>;
}

impl<T: TableRecord> RowDecoder for ReadMapper<'_, T> {
    type Output = T;

    fn read_names(&mut self, header: &Row) -> Result<()> {
        self.resolve_names(header)
    }

    fn decode(&mut self, row: &Row, errors: &mut ErrorAggregator) -> Result<T> {
        self.to_object(row, errors)
    }
}

/// Passes rows through unconverted
#[derive(Debug, Default)]
pub struct RawRows;

impl RowDecoder for RawRows {
    type Output = Row;

    fn read_names(&mut self, _header: &Row) -> Result<()> {
        Ok(())
    }

    fn decode(&mut self, row: &Row, _errors: &mut ErrorAggregator) -> Result<Row> {
        Ok(row.clone())
    }
}

pub(crate) type Opener<'r> = Box<dyn FnOnce() -> Result<Box<dyn RowSource + 'r>> + 'r>;

enum Stage<'r> {
    Pending(Opener<'r>),
    Open(ResourceGuard<'r>),
    Finished,
}

/// One lazy pass over a source.
///
/// Yields `Ok` for every data row, including rows whose failures were
/// recorded. The pass ends with at most one `Err`: a resource or header
/// error, or the [`AggregatedError`] once the
/// failure limit is exceeded or the source is exhausted with failures stored.
pub struct Records<'r, D: RowDecoder> {
    stage: Stage<'r>,
    name: String,
    decoder: D,
    errors: ErrorAggregator,
    has_names: bool,
    row: Row,
    names_seen: bool,
    rows_read: usize,
    yielded: usize,
}

impl<'r, D: RowDecoder> Records<'r, D> {
    pub(crate) fn new(
        opener: Opener<'r>,
        name: impl Into<String>,
        decoder: D,
        errors: ErrorAggregator,
        has_names: bool,
    ) -> Self {
        Self {
            stage: Stage::Pending(opener),
            name: name.into(),
            decoder,
            errors,
            has_names,
            row: Row::new(),
            names_seen: false,
            rows_read: 0,
            yielded: 0,
        }
    }

    /// Failures recorded so far in this pass
    pub fn failures(&self) -> &[RowFailure] {
        self.errors.failures()
    }

    /// Stop the pass and take any failures it has not reported yet.
    ///
    /// The source is released first. Returns `None` when nothing was
    /// collected or the aggregate was already yielded by `next`.
    pub fn into_failures(mut self) -> Option<AggregatedError> {
        if let Stage::Open(mut guard) = std::mem::replace(&mut self.stage, Stage::Finished)
            && let Err(e) = guard.release()
        {
            warn!("Failed to close {}: {}", self.name, e);
        }
        debug!("Pass over {} stopped after {} items", self.name, self.yielded);
        self.errors.take_unreported()
    }

    /// True until the first `next` call opens the source
    pub fn is_pending(&self) -> bool {
        matches!(self.stage, Stage::Pending(_))
    }

    /// True once the source has been released
    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Finished)
    }

    /// End the pass: release the resource, then surface `error` if any
    fn finish(&mut self, error: Option<MappingError>) -> Option<Result<D::Output>> {
        let stage = std::mem::replace(&mut self.stage, Stage::Finished);
        let released = match stage {
            Stage::Open(mut guard) => guard.release(),
            _ => Ok(()),
        };

        info!(
            "Finished pass over {}: {} rows read, {} items yielded, {} failures",
            self.name,
            self.rows_read,
            self.yielded,
            self.errors.len()
        );

        if let Some(error) = error {
            if let Err(close_error) = released {
                warn!("Failed to close {}: {}", self.name, close_error);
            }
            return Some(Err(error));
        }
        if let Err(close_error) = released {
            return Some(Err(close_error));
        }
        match self.errors.finish() {
            Ok(()) => None,
            Err(aggregated) => Some(Err(aggregated.into())),
        }
    }

    fn open(&mut self, opener: Opener<'r>) -> Result<()> {
        info!("Opening {}", self.name);
        let source = opener()?;
        self.stage = Stage::Open(ResourceGuard::new(source, self.name.clone()));
        Ok(())
    }
}

impl<D: RowDecoder> Iterator for Records<'_, D> {
    type Item = Result<D::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_pending()
            && let Stage::Pending(opener) = std::mem::replace(&mut self.stage, Stage::Finished)
            && let Err(e) = self.open(opener)
        {
            return self.finish(Some(e));
        }

        loop {
            let Stage::Open(guard) = &mut self.stage else {
                return None;
            };
            let Some(source) = guard.source() else {
                return self.finish(None);
            };

            match source.read_row(&mut self.row) {
                Ok(true) => {}
                Ok(false) => return self.finish(None),
                Err(e) => return self.finish(Some(e)),
            }
            self.rows_read += 1;

            if self.row.is_blank_line() {
                debug!(
                    "Skipping blank row at line {} of {}",
                    self.row.line_number().unwrap_or_default(),
                    self.name
                );
                continue;
            }

            if self.has_names && !self.names_seen {
                self.names_seen = true;
                if let Err(e) = self.decoder.read_names(&self.row) {
                    return self.finish(Some(e));
                }
                continue;
            }

            return match self.decoder.decode(&self.row, &mut self.errors) {
                Ok(item) => {
                    self.yielded += 1;
                    Some(Ok(item))
                }
                Err(e) => self.finish(Some(e)),
            };
        }
    }
}

impl<D: RowDecoder> Drop for Records<'_, D> {
    fn drop(&mut self) {
        if let Stage::Open(guard) = &mut self.stage {
            debug!("Pass over {} stopped early after {} items", self.name, self.yielded);
            if let Err(e) = guard.release() {
                warn!("Failed to close {}: {}", self.name, e);
            }
        }
        if self.errors.has_unreported() {
            warn!(
                "Pass over {} dropped with {} unreported conversion failure(s)",
                self.name,
                self.errors.len()
            );
        }
    }
}
