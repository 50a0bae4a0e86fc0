//! Culture-aware number and date conventions.
//!
//! A [`Culture`] supplies the decimal and group separators and the default
//! date patterns used by field conversion. Only a small built-in table of
//! cultures is provided; callers needing others construct one directly.

use crate::constants::MAX_FORMAT_PRECISION;
use crate::error::ConversionErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Separators and date patterns for one culture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    /// Culture name, e.g. "nl-NL"
    pub name: String,

    /// Character between integer and fractional digits
    pub decimal_separator: char,

    /// Character between thousands groups
    pub group_separator: char,

    /// strftime pattern for dates
    pub date_format: String,

    /// strftime pattern for date/times
    pub datetime_format: String,
}

impl Culture {
    /// Culture-neutral conventions (same separators as en-US)
    pub fn invariant() -> Self {
        Self::build("", '.', ',', "%m/%d/%Y", "%m/%d/%Y %H:%M:%S")
    }

    /// Look up a built-in culture by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let culture = match name.trim().to_ascii_lowercase().as_str() {
            "" | "invariant" => Self::invariant(),
            "en-us" => Self::build("en-US", '.', ',', "%m/%d/%Y", "%m/%d/%Y %H:%M:%S"),
            "en-gb" => Self::build("en-GB", '.', ',', "%d/%m/%Y", "%d/%m/%Y %H:%M:%S"),
            "nl-nl" => Self::build("nl-NL", ',', '.', "%d-%m-%Y", "%d-%m-%Y %H:%M:%S"),
            "de-de" => Self::build("de-DE", ',', '.', "%d.%m.%Y", "%d.%m.%Y %H:%M:%S"),
            "fr-fr" => Self::build("fr-FR", ',', '\u{a0}', "%d/%m/%Y", "%d/%m/%Y %H:%M:%S"),
            _ => return None,
        };
        Some(culture)
    }

    fn build(
        name: &str,
        decimal_separator: char,
        group_separator: char,
        date_format: &str,
        datetime_format: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            decimal_separator,
            group_separator,
            date_format: date_format.to_string(),
            datetime_format: datetime_format.to_string(),
        }
    }

    /// Rewrite a culture-formatted number into Rust's parse syntax
    pub fn normalize_number(&self, raw: &str) -> String {
        raw.trim()
            .chars()
            .filter(|c| *c != self.group_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    /// Rewrite a Rust-formatted number (with '.' and ',') into this culture
    pub fn localize_number(&self, formatted: &str) -> String {
        formatted
            .chars()
            .map(|c| match c {
                '.' => self.decimal_separator,
                ',' => self.group_separator,
                other => other,
            })
            .collect()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Numeric output format parsed from an explicit format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `G` - shortest round-trip representation
    General,
    /// `F<n>` - fixed number of decimals
    Fixed(usize),
    /// `N<n>` - fixed decimals with group separators
    Grouped(usize),
    /// `D<n>` - integer zero-padded to at least n digits
    Padded(usize),
}

impl NumberFormat {
    pub fn parse(format: &str, kind: &'static str) -> Result<Self, ConversionErrorKind> {
        let unsupported = || ConversionErrorKind::UnsupportedFormat {
            format: format.to_string(),
            kind,
        };

        let mut chars = format.chars();
        let specifier = chars.next().ok_or_else(unsupported)?;
        let digits = chars.as_str();
        let precision = if digits.is_empty() {
            None
        } else {
            let precision = digits.parse::<usize>().map_err(|_| unsupported())?;
            if precision > MAX_FORMAT_PRECISION {
                return Err(unsupported());
            }
            Some(precision)
        };

        match specifier.to_ascii_uppercase() {
            'G' if precision.is_none() => Ok(Self::General),
            'F' => Ok(Self::Fixed(precision.unwrap_or(2))),
            'N' => Ok(Self::Grouped(precision.unwrap_or(2))),
            'D' => Ok(Self::Padded(precision.unwrap_or(1))),
            _ => Err(unsupported()),
        }
    }
}

/// Format an integer according to an optional explicit format.
///
/// Works on the exact decimal digits, so no precision is lost for wide values.
pub fn format_integer(
    value: i128,
    format: Option<&str>,
    culture: &Culture,
    kind: &'static str,
) -> Result<String, ConversionErrorKind> {
    let spec = match format {
        Some(f) => NumberFormat::parse(f, kind)?,
        None => NumberFormat::General,
    };

    let text = match spec {
        NumberFormat::General => value.to_string(),
        NumberFormat::Padded(width) => {
            let digits = format!("{:0width$}", value.unsigned_abs(), width = width);
            if value < 0 { format!("-{digits}") } else { digits }
        }
        NumberFormat::Fixed(decimals) => with_zero_decimals(value, decimals),
        NumberFormat::Grouped(decimals) => group_digits(&with_zero_decimals(value, decimals)),
    };
    Ok(culture.localize_number(&text))
}

/// Format a float according to an optional explicit format.
///
/// `G` uses the value's own shortest representation, so an `f32` is not
/// widened before printing.
pub fn format_float<F: Display>(
    value: F,
    format: Option<&str>,
    culture: &Culture,
    kind: &'static str,
) -> Result<String, ConversionErrorKind> {
    let spec = match format {
        Some(f) => NumberFormat::parse(f, kind)?,
        None => NumberFormat::General,
    };

    let text = match spec {
        NumberFormat::General => value.to_string(),
        NumberFormat::Fixed(decimals) => fixed(value, decimals),
        NumberFormat::Grouped(decimals) => group_digits(&fixed(value, decimals)),
        NumberFormat::Padded(_) => {
            return Err(ConversionErrorKind::UnsupportedFormat {
                format: format.unwrap_or_default().to_string(),
                kind,
            });
        }
    };
    Ok(culture.localize_number(&text))
}

fn fixed<F: Display>(value: F, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn with_zero_decimals(value: i128, decimals: usize) -> String {
    if decimals == 0 {
        value.to_string()
    } else {
        format!("{}.{}", value, "0".repeat(decimals))
    }
}

/// Insert ',' between thousands groups of the integer part
fn group_digits(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
