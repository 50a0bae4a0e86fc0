//! Test fixtures for record mapping
//!
//! Provides a representative record type covering every supported field kind,
//! plus helpers to build rows without a tabular source.

use chrono::{NaiveDate, NaiveDateTime};

use crate::aggregate::ErrorAggregator;
use crate::table_column;
use crate::config::{ErrorLimit, FileDescription};
use crate::mapping::{Column, TableRecord};
use crate::models::{Cell, Row};

// Test modules
mod field_type_tests;
mod writer_tests;

/// Product record exercising strings, numbers, dates, booleans and optionals
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub nbr_available: u32,
    pub on_sale: bool,
    pub description: String,
    pub launch_time: Option<NaiveDateTime>,
}

impl TableRecord for Product {
    fn columns() -> Vec<Column<Self>> {
        vec![
            table_column!(Product, name).ordinal(1).max_length(10).required(),
            table_column!(Product, price).ordinal(2).format("F2"),
            table_column!(Product, start_date, "StartDate").ordinal(3),
            table_column!(Product, nbr_available, "Available").ordinal(4),
            table_column!(Product, on_sale).ordinal(5),
            table_column!(Product, description),
            table_column!(Product, launch_time, "LaunchTime").ordinal(6),
        ]
    }
}

impl Product {
    pub fn sample() -> Self {
        Self {
            name: "Desk lamp".to_string(),
            price: 24.5,
            start_date: NaiveDate::from_ymd_opt(2008, 11, 30).unwrap(),
            nbr_available: 12,
            on_sale: true,
            description: "Adjustable, warm light".to_string(),
            launch_time: None,
        }
    }
}

/// Record without any explicit column declarations
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Note {
    pub title: String,
    pub body: String,
}

impl TableRecord for Note {
    fn columns() -> Vec<Column<Self>> {
        vec![table_column!(Note, title), table_column!(Note, body)]
    }
}

/// Build a row whose cells all carry `line`
pub fn row(values: &[&str], line: usize) -> Row {
    values.iter().map(|v| Cell::new(*v, line)).collect()
}

/// Aggregator that never trips, so tests can inspect every failure
pub fn collector() -> ErrorAggregator {
    ErrorAggregator::new("Product", "test", ErrorLimit::Unlimited)
}

pub fn description() -> FileDescription {
    FileDescription::new()
}

pub fn named_description() -> FileDescription {
    FileDescription::new().with_column_names(true)
}
