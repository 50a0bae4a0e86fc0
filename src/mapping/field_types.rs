//! Typed cell conversion rules.
//!
//! Every field type that can take part in a mapping implements [`FieldType`]:
//! it knows how to parse itself from a non-blank cell and how to format itself
//! back into one, honoring an optional explicit format and the field's culture.

use crate::constants::{
    FALSE_LITERAL, ISO_DATE_FORMATS, ISO_DATETIME_FORMATS, TRUE_LITERAL, ZONED_DATETIME_FORMATS,
};
use crate::culture::{Culture, format_float, format_integer};
use crate::error::ConversionErrorKind;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::Write as _;

/// Resolved conversion settings for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRule {
    /// Explicit output/input format; takes precedence over type defaults
    pub format: Option<String>,
    pub culture: Culture,
}

impl ConversionRule {
    pub fn new(format: Option<String>, culture: Culture) -> Self {
        Self { format, culture }
    }
}

impl Default for ConversionRule {
    fn default() -> Self {
        Self::new(None, Culture::invariant())
    }
}

/// A value that can be stored in a mapped field
pub trait FieldType: Default {
    /// Type name used in conversion error messages
    const KIND: &'static str;

    /// Parse a non-blank cell value
    fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind>;

    /// Format the value for output
    fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind>;
}

impl FieldType for String {
    const KIND: &'static str = "string";

    fn parse_cell(raw: &str, _rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        Ok(raw.to_string())
    }

    fn format_cell(&self, _rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        Ok(self.clone())
    }
}

impl FieldType for char {
    const KIND: &'static str = "char";

    fn parse_cell(raw: &str, _rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionErrorKind::InvalidChar {
                value: raw.to_string(),
            }),
        }
    }

    fn format_cell(&self, _rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        Ok(self.to_string())
    }
}

impl FieldType for bool {
    const KIND: &'static str = "bool";

    fn parse_cell(raw: &str, _rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(TRUE_LITERAL) {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case(FALSE_LITERAL) {
            Ok(false)
        } else {
            Err(ConversionErrorKind::InvalidBoolean {
                value: raw.to_string(),
            })
        }
    }

    fn format_cell(&self, _rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        Ok(if *self { TRUE_LITERAL } else { FALSE_LITERAL }.to_string())
    }
}

macro_rules! integer_field_type {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: &'static str = stringify!($ty);

                fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
                    rule.culture
                        .normalize_number(raw)
                        .parse::<$ty>()
                        .map_err(|_| ConversionErrorKind::InvalidNumber {
                            value: raw.to_string(),
                            kind: Self::KIND,
                        })
                }

                fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
                    format_integer(*self as i128, rule.format.as_deref(), &rule.culture, Self::KIND)
                }
            }
        )*
    };
}

integer_field_type!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_field_type {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: &'static str = stringify!($ty);

                fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
                    rule.culture
                        .normalize_number(raw)
                        .parse::<$ty>()
                        .map_err(|_| ConversionErrorKind::InvalidNumber {
                            value: raw.to_string(),
                            kind: Self::KIND,
                        })
                }

                fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
                    format_float(*self, rule.format.as_deref(), &rule.culture, Self::KIND)
                }
            }
        )*
    };
}

float_field_type!(f32, f64);

impl FieldType for NaiveDate {
    const KIND: &'static str = "date";

    fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        let trimmed = raw.trim();
        let patterns = date_patterns(rule);
        patterns
            .iter()
            .find_map(|p| NaiveDate::parse_from_str(trimmed, p).ok())
            .ok_or_else(|| invalid_datetime(raw, Self::KIND, &patterns))
    }

    fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        let pattern = rule.format.as_deref().unwrap_or(&rule.culture.date_format);
        render(pattern, Self::KIND, |items, out| {
            write!(out, "{}", self.format_with_items(items))
        })
    }
}

impl FieldType for NaiveDateTime {
    const KIND: &'static str = "datetime";

    fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        parse_naive_datetime(raw.trim(), rule).ok_or_else(|| {
            let mut patterns = datetime_patterns(rule);
            patterns.extend(date_patterns(rule));
            invalid_datetime(raw, Self::KIND, &patterns)
        })
    }

    fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        let pattern = rule
            .format
            .as_deref()
            .unwrap_or(&rule.culture.datetime_format);
        render(pattern, Self::KIND, |items, out| {
            write!(out, "{}", self.format_with_items(items))
        })
    }
}

impl FieldType for DateTime<Utc> {
    const KIND: &'static str = "UTC datetime";

    fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        let trimmed = raw.trim();

        // Zoned patterns first, then naive values taken as UTC
        let zoned = rule
            .format
            .iter()
            .map(String::as_str)
            .chain(ZONED_DATETIME_FORMATS.iter().copied())
            .find_map(|p| DateTime::parse_from_str(trimmed, p).ok())
            .map(|dt| dt.with_timezone(&Utc));
        if let Some(dt) = zoned {
            return Ok(dt);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        parse_naive_datetime(trimmed, rule)
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
            .ok_or_else(|| {
                let mut patterns: Vec<String> =
                    ZONED_DATETIME_FORMATS.iter().map(|p| p.to_string()).collect();
                patterns.extend(datetime_patterns(rule));
                invalid_datetime(raw, Self::KIND, &patterns)
            })
    }

    fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        let pattern = rule
            .format
            .as_deref()
            .unwrap_or(&rule.culture.datetime_format);
        render(pattern, Self::KIND, |items, out| {
            write!(out, "{}", self.format_with_items(items))
        })
    }
}

impl<F: FieldType> FieldType for Option<F> {
    const KIND: &'static str = F::KIND;

    fn parse_cell(raw: &str, rule: &ConversionRule) -> Result<Self, ConversionErrorKind> {
        F::parse_cell(raw, rule).map(Some)
    }

    fn format_cell(&self, rule: &ConversionRule) -> Result<String, ConversionErrorKind> {
        match self {
            Some(value) => value.format_cell(rule),
            None => Ok(String::new()),
        }
    }
}

fn parse_naive_datetime(trimmed: &str, rule: &ConversionRule) -> Option<NaiveDateTime> {
    datetime_patterns(rule)
        .iter()
        .find_map(|p| NaiveDateTime::parse_from_str(trimmed, p).ok())
        .or_else(|| {
            // Date-only values map to midnight
            date_patterns(rule)
                .iter()
                .find_map(|p| NaiveDate::parse_from_str(trimmed, p).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Explicit format, then culture pattern, then ISO fallbacks
fn date_patterns(rule: &ConversionRule) -> Vec<String> {
    rule.format
        .iter()
        .cloned()
        .chain(std::iter::once(rule.culture.date_format.clone()))
        .chain(ISO_DATE_FORMATS.iter().map(|p| p.to_string()))
        .collect()
}

fn datetime_patterns(rule: &ConversionRule) -> Vec<String> {
    rule.format
        .iter()
        .cloned()
        .chain(std::iter::once(rule.culture.datetime_format.clone()))
        .chain(ISO_DATETIME_FORMATS.iter().map(|p| p.to_string()))
        .collect()
}

fn invalid_datetime(raw: &str, kind: &'static str, patterns: &[String]) -> ConversionErrorKind {
    ConversionErrorKind::InvalidDateTime {
        value: raw.to_string(),
        kind,
        patterns: patterns.join(", "),
    }
}

/// Format through a strftime pattern without panicking on bad patterns or
/// on specifiers the value cannot supply (e.g. `%H` for a date).
fn render<'p, F>(
    pattern: &'p str,
    kind: &'static str,
    write_value: F,
) -> Result<String, ConversionErrorKind>
where
    F: FnOnce(std::vec::IntoIter<Item<'p>>, &mut String) -> std::fmt::Result,
{
    let unsupported = || ConversionErrorKind::UnsupportedFormat {
        format: pattern.to_string(),
        kind,
    };

    let items: Vec<Item<'p>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(unsupported());
    }

    let mut out = String::new();
    write_value(items.into_iter(), &mut out).map_err(|_| unsupported())?;
    Ok(out)
}
