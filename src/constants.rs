//! Library constants for tablemap
//!
//! Default values for file descriptions, built-in culture patterns, and the
//! fallback formats used when a cell does not match its culture's patterns.

// =============================================================================
// File Description Defaults
// =============================================================================

/// Default number of row conversion failures tolerated before a read aborts
pub const DEFAULT_MAXIMUM_NBR_EXCEPTIONS: usize = 100;

/// Default culture used for number and date conversion
pub const DEFAULT_CULTURE_NAME: &str = "en-US";

/// Default (and only supported) text encoding
pub const DEFAULT_TEXT_ENCODING: &str = "utf-8";

/// Text encoding names accepted as UTF-8
pub const UTF8_ENCODING_NAMES: &[&str] = &["utf-8", "utf8"];

// =============================================================================
// Conversion Fallbacks
// =============================================================================

/// ISO-8601 date patterns tried after the culture's own patterns
pub const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// ISO-8601 date/time patterns tried after the culture's own patterns
pub const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Zoned date/time patterns tried for `DateTime<Utc>` fields
pub const ZONED_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];

/// Largest precision accepted in `F`, `N` and `D` number formats
pub const MAX_FORMAT_PRECISION: usize = 99;

/// Literal values accepted for boolean fields (compared case-insensitively)
pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoding_is_accepted() {
        assert!(UTF8_ENCODING_NAMES.contains(&DEFAULT_TEXT_ENCODING));
    }

    #[test]
    fn test_iso_formats_are_valid_patterns() {
        use chrono::format::{Item, StrftimeItems};

        for pattern in ISO_DATE_FORMATS
            .iter()
            .chain(ISO_DATETIME_FORMATS)
            .chain(ZONED_DATETIME_FORMATS)
        {
            assert!(
                !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)),
                "invalid pattern {pattern}"
            );
        }
    }
}
