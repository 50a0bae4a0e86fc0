//! File description options for read and write operations.
//!
//! A [`FileDescription`] tells the mapper how to interpret a tabular source:
//! whether the first row carries column names, which fields take part in the
//! mapping, which culture governs conversion, and how many row failures to
//! tolerate before a read aborts.

use crate::constants::{
    DEFAULT_CULTURE_NAME, DEFAULT_MAXIMUM_NBR_EXCEPTIONS, DEFAULT_TEXT_ENCODING,
    UTF8_ENCODING_NAMES,
};
use crate::culture::Culture;
use crate::error::{MappingError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How many row conversion failures a read tolerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorLimit {
    /// Collect every failure and report them once iteration completes
    Unlimited,
    /// Abort on the first failure
    FailOnFirst,
    /// Tolerate this many failures; the next one aborts the read
    Max(usize),
}

impl ErrorLimit {
    /// Interpret a signed count: zero or negative means unlimited
    pub fn from_count(count: i64) -> Self {
        if count <= 0 {
            Self::Unlimited
        } else {
            Self::Max(count as usize)
        }
    }

    /// True when `collected` failures exceed what this limit tolerates
    pub fn is_exceeded_by(&self, collected: usize) -> bool {
        match self {
            Self::Unlimited => false,
            Self::FailOnFirst => collected >= 1,
            Self::Max(max) => collected > *max,
        }
    }
}

impl Default for ErrorLimit {
    fn default() -> Self {
        Self::Max(DEFAULT_MAXIMUM_NBR_EXCEPTIONS)
    }
}

/// Description of a tabular file or stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDescription {
    /// Treat the first non-blank row as column names rather than data
    pub first_line_has_column_names: bool,

    /// Only map columns carrying an explicit declaration
    /// (ordinal, length, required flag, format or culture)
    pub enforce_column_attribute: bool,

    /// Text encoding of the source or sink; only UTF-8 is supported
    pub text_encoding: String,

    /// Culture used for number and date conversion
    pub culture_name: String,

    /// Row failure cap for reads
    pub maximum_nbr_exceptions: ErrorLimit,
}

impl Default for FileDescription {
    fn default() -> Self {
        Self {
            first_line_has_column_names: false,
            enforce_column_attribute: false,
            text_encoding: DEFAULT_TEXT_ENCODING.to_string(),
            culture_name: DEFAULT_CULTURE_NAME.to_string(),
            maximum_nbr_exceptions: ErrorLimit::default(),
        }
    }
}

impl FileDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the first row holds column names
    pub fn with_column_names(mut self, enabled: bool) -> Self {
        self.first_line_has_column_names = enabled;
        self
    }

    /// Set whether only declared columns are mapped
    pub fn with_enforced_columns(mut self, enabled: bool) -> Self {
        self.enforce_column_attribute = enabled;
        self
    }

    pub fn with_culture(mut self, culture_name: impl Into<String>) -> Self {
        self.culture_name = culture_name.into();
        self
    }

    pub fn with_text_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.text_encoding = encoding.into();
        self
    }

    pub fn with_error_limit(mut self, limit: ErrorLimit) -> Self {
        self.maximum_nbr_exceptions = limit;
        self
    }

    /// Resolve the file culture
    pub fn culture(&self) -> Result<Culture> {
        Culture::from_name(&self.culture_name).ok_or_else(|| {
            MappingError::configuration(format!("Unknown culture '{}'", self.culture_name))
        })
    }

    /// Validate settings before any resource is touched
    pub fn validate(&self) -> Result<()> {
        let encoding = self.text_encoding.trim().to_ascii_lowercase();
        if !UTF8_ENCODING_NAMES.contains(&encoding.as_str()) {
            return Err(MappingError::configuration(format!(
                "Unsupported text encoding '{}' (only UTF-8 is supported)",
                self.text_encoding
            )));
        }

        self.culture()?;

        debug!(
            "File description validated: names={}, enforce={}, culture='{}', limit={:?}",
            self.first_line_has_column_names,
            self.enforce_column_attribute,
            self.culture_name,
            self.maximum_nbr_exceptions
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_description_default() {
        let description = FileDescription::default();
        assert!(!description.first_line_has_column_names);
        assert!(!description.enforce_column_attribute);
        assert_eq!(description.text_encoding, "utf-8");
        assert_eq!(description.culture_name, "en-US");
        assert_eq!(
            description.maximum_nbr_exceptions,
            ErrorLimit::Max(DEFAULT_MAXIMUM_NBR_EXCEPTIONS)
        );
        assert!(description.validate().is_ok());
    }

    #[test]
    fn test_file_description_builder() {
        let description = FileDescription::new()
            .with_column_names(true)
            .with_enforced_columns(true)
            .with_culture("nl-NL")
            .with_text_encoding("UTF8")
            .with_error_limit(ErrorLimit::FailOnFirst);

        assert!(description.first_line_has_column_names);
        assert!(description.enforce_column_attribute);
        assert_eq!(description.culture().unwrap().decimal_separator, ',');
        assert_eq!(description.maximum_nbr_exceptions, ErrorLimit::FailOnFirst);
        assert!(description.validate().is_ok());
    }

    #[test]
    fn test_file_description_validation() {
        let bad_encoding = FileDescription::new().with_text_encoding("utf-16");
        assert!(matches!(
            bad_encoding.validate(),
            Err(MappingError::Configuration { .. })
        ));

        let bad_culture = FileDescription::new().with_culture("tlh-KL");
        assert!(matches!(
            bad_culture.validate(),
            Err(MappingError::Configuration { .. })
        ));
    }

    #[test]
    fn test_error_limit_from_count() {
        assert_eq!(ErrorLimit::from_count(-1), ErrorLimit::Unlimited);
        assert_eq!(ErrorLimit::from_count(0), ErrorLimit::Unlimited);
        assert_eq!(ErrorLimit::from_count(5), ErrorLimit::Max(5));
    }

    #[test]
    fn test_error_limit_thresholds() {
        assert!(!ErrorLimit::Unlimited.is_exceeded_by(10_000));
        assert!(ErrorLimit::FailOnFirst.is_exceeded_by(1));
        assert!(!ErrorLimit::FailOnFirst.is_exceeded_by(0));
        assert!(!ErrorLimit::Max(2).is_exceeded_by(2));
        assert!(ErrorLimit::Max(2).is_exceeded_by(3));
    }
}
