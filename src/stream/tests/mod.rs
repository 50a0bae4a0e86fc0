//! Test utilities for streaming reads and writes
//!
//! Provides a [`TableFormat`] that counts how often sources are opened and
//! closed, record fixtures, and log capture for the test harness.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use crate::table_column;
use crate::error::Result;
use crate::format::{CsvFormat, RowSink, RowSource, TableFormat};
use crate::mapping::{Column, TableRecord};
use crate::models::Row;
use crate::stream::TableContext;


static LOGGING: Once = Once::new();

/// Route library logs through the test writer, filtered by `RUST_LOG`
pub fn init_logging() {
    LOGGING.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablemap=debug"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_test_writer())
            .try_init();
    });
}

/// Open/close counters shared between a [`CountingFormat`] and the test
#[derive(Debug, Clone, Default)]
pub struct Counters {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// CSV format that records source lifecycle events
pub struct CountingFormat {
    inner: CsvFormat,
    counters: Counters,
}

impl TableFormat for CountingFormat {
    fn open_source<'r>(&self, input: Box<dyn Read + 'r>, name: &str) -> Result<Box<dyn RowSource + 'r>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.open_source(input, name)?;
        Ok(Box::new(CountingSource {
            inner,
            closes: Arc::clone(&self.counters.closes),
        }))
    }

    fn open_sink<'w>(&self, output: Box<dyn Write + 'w>, name: &str) -> Result<Box<dyn RowSink + 'w>> {
        self.inner.open_sink(output, name)
    }
}

struct CountingSource<'r> {
    inner: Box<dyn RowSource + 'r>,
    closes: Arc<AtomicUsize>,
}

impl RowSource for CountingSource<'_> {
    fn read_row(&mut self, row: &mut Row) -> Result<bool> {
        self.inner.read_row(row)
    }

    fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()
    }
}

/// CSV context whose source opens and closes can be observed
pub fn counting_context() -> (TableContext, Counters) {
    init_logging();
    let counters = Counters::default();
    let format = CountingFormat {
        inner: CsvFormat::default(),
        counters: counters.clone(),
    };
    (TableContext::new(format), counters)
}

/// Stock level record used by streaming tests
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stock {
    pub sku: String,
    pub quantity: i32,
    pub counted_on: NaiveDate,
}

impl TableRecord for Stock {
    fn columns() -> Vec<Column<Self>> {
        vec![
            table_column!(Stock, sku).required(),
            table_column!(Stock, quantity),
            table_column!(Stock, counted_on, "CountedOn").format("%Y-%m-%d"),
        ]
    }
}

impl Stock {
    pub fn new(sku: &str, quantity: i32, counted_on: (i32, u32, u32)) -> Self {
        Self {
            sku: sku.to_string(),
            quantity,
            counted_on: NaiveDate::from_ymd_opt(counted_on.0, counted_on.1, counted_on.2).unwrap(),
        }
    }
}

pub fn stock_list() -> Vec<Stock> {
    vec![
        Stock::new("A-100", 12, (2024, 1, 8)),
        Stock::new("B-220", 0, (2024, 1, 9)),
        Stock::new("C-305", 47, (2024, 2, 1)),
    ]
}
