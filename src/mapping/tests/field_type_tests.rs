//! Tests for typed cell conversion

use super::*;
use crate::culture::Culture;
use crate::error::ConversionErrorKind;
use crate::mapping::{ConversionRule, FieldType};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};

fn rule(format: Option<&str>, culture: &str) -> ConversionRule {
    ConversionRule::new(format.map(str::to_string), Culture::from_name(culture).unwrap())
}

#[test]
fn test_numbers_follow_culture_separators() {
    let us = rule(None, "en-US");
    let dutch = rule(None, "nl-NL");

    assert_eq!(f64::parse_cell("1,234.5", &us).unwrap(), 1234.5);
    assert_eq!(f64::parse_cell("4,59", &dutch).unwrap(), 4.59);
    assert_eq!(u32::parse_cell(" 1.000 ", &dutch).unwrap(), 1000);
    assert_eq!(i64::parse_cell("-17", &us).unwrap(), -17);

    assert_eq!(4.59f64.format_cell(&dutch).unwrap(), "4,59");
    assert_eq!(1234.5f64.format_cell(&rule(Some("N2"), "en-US")).unwrap(), "1,234.50");
    assert_eq!(7u8.format_cell(&rule(Some("D3"), "en-US")).unwrap(), "007");
}

#[test]
fn test_invalid_number_reports_value_and_kind() {
    let error = u32::parse_cell("twelve", &rule(None, "en-US")).unwrap_err();
    assert_eq!(
        error,
        ConversionErrorKind::InvalidNumber {
            value: "twelve".to_string(),
            kind: "u32",
        }
    );

    assert!(u8::parse_cell("256", &rule(None, "en-US")).is_err());
    assert!(u32::parse_cell("-1", &rule(None, "en-US")).is_err());
}

#[test]
fn test_unsupported_number_format_fails_on_write() {
    let error = 2.5f64.format_cell(&rule(Some("#.##"), "en-US")).unwrap_err();
    assert!(matches!(error, ConversionErrorKind::UnsupportedFormat { .. }));
}

#[test]
fn test_booleans_are_case_insensitive_literals() {
    let invariant = ConversionRule::default();
    assert!(bool::parse_cell("TRUE", &invariant).unwrap());
    assert!(!bool::parse_cell(" false ", &invariant).unwrap());
    assert!(matches!(
        bool::parse_cell("yes", &invariant),
        Err(ConversionErrorKind::InvalidBoolean { .. })
    ));
    assert_eq!(true.format_cell(&invariant).unwrap(), "true");
}

#[test]
fn test_char_requires_exactly_one_character() {
    let invariant = ConversionRule::default();
    assert_eq!(char::parse_cell("x", &invariant).unwrap(), 'x');
    assert!(char::parse_cell("xy", &invariant).is_err());
}

#[test]
fn test_dates_use_culture_then_iso_patterns() {
    let us = rule(None, "en-US");
    let dutch = rule(None, "nl-NL");
    let expected = NaiveDate::from_ymd_opt(2008, 11, 30).unwrap();

    assert_eq!(NaiveDate::parse_cell("11/30/2008", &us).unwrap(), expected);
    assert_eq!(NaiveDate::parse_cell("30-11-2008", &dutch).unwrap(), expected);
    assert_eq!(NaiveDate::parse_cell("2008-11-30", &dutch).unwrap(), expected);

    assert_eq!(expected.format_cell(&dutch).unwrap(), "30-11-2008");
    assert_eq!(
        expected.format_cell(&rule(Some("%Y%m%d"), "en-US")).unwrap(),
        "20081130"
    );
}

#[test]
fn test_invalid_date_lists_patterns_tried() {
    let error = NaiveDate::parse_cell("31/31/2008", &rule(None, "en-US")).unwrap_err();
    match error {
        ConversionErrorKind::InvalidDateTime { value, patterns, .. } => {
            assert_eq!(value, "31/31/2008");
            assert!(patterns.contains("%m/%d/%Y"));
            assert!(patterns.contains("%Y-%m-%d"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_datetime_accepts_date_only_values() {
    let us = rule(None, "en-US");
    let midnight = NaiveDate::from_ymd_opt(2008, 11, 30)
        .unwrap()
        .and_time(NaiveTime::MIN);

    assert_eq!(NaiveDateTime::parse_cell("11/30/2008", &us).unwrap(), midnight);
    assert_eq!(
        NaiveDateTime::parse_cell("2008-11-30T14:05:00", &us).unwrap(),
        NaiveDate::from_ymd_opt(2008, 11, 30)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    );
    assert_eq!(midnight.format_cell(&us).unwrap(), "11/30/2008 00:00:00");
}

#[test]
fn test_utc_datetime_normalizes_offsets() {
    let us = rule(None, "en-US");
    let expected: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    assert_eq!(
        DateTime::<Utc>::parse_cell("2024-03-01 12:00:00 +0200", &us).unwrap(),
        expected
    );
    assert_eq!(
        DateTime::<Utc>::parse_cell("2024-03-01T10:00:00Z", &us).unwrap(),
        expected
    );
    assert_eq!(
        DateTime::<Utc>::parse_cell("03/01/2024 10:00:00", &us).unwrap(),
        expected
    );
}

#[test]
fn test_bad_date_pattern_fails_without_panicking() {
    let date = NaiveDate::from_ymd_opt(2008, 11, 30).unwrap();
    assert!(matches!(
        date.format_cell(&rule(Some("%Q"), "en-US")),
        Err(ConversionErrorKind::UnsupportedFormat { .. })
    ));
    // A date cannot supply an hour
    assert!(matches!(
        date.format_cell(&rule(Some("%H"), "en-US")),
        Err(ConversionErrorKind::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_optional_fields() {
    let us = rule(None, "en-US");
    assert_eq!(Option::<u32>::parse_cell("5", &us).unwrap(), Some(5));
    assert_eq!(Option::<u32>::None.format_cell(&us).unwrap(), "");
    assert_eq!(<Option<f64> as FieldType>::KIND, "f64");
}

#[test]
fn test_single_precision_written_at_its_own_precision() {
    let invariant = ConversionRule::default();
    assert_eq!(0.1f32.format_cell(&invariant).unwrap(), "0.1");
    assert_eq!(1.5f32.format_cell(&rule(Some("F2"), "nl-NL")).unwrap(), "1,50");
    assert_eq!(f32::parse_cell("0.1", &invariant).unwrap(), 0.1f32);
}

#[test]
fn test_wide_integers_keep_every_digit_when_formatted() {
    let us = rule(Some("N0"), "en-US");
    assert_eq!((u64::MAX - 1).format_cell(&us).unwrap(), "18,446,744,073,709,551,614");
    assert_eq!(
        (u64::MAX - 1).format_cell(&rule(Some("F0"), "en-US")).unwrap(),
        "18446744073709551614"
    );
}

#[test]
fn test_huge_format_precision_fails_instead_of_panicking() {
    let error = 5i32.format_cell(&rule(Some("D70000"), "en-US")).unwrap_err();
    assert!(matches!(error, ConversionErrorKind::UnsupportedFormat { .. }));
    assert!(2.5f64.format_cell(&rule(Some("N70000"), "en-US")).is_err());
}
