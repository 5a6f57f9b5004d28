//! Redaction configuration.

use crate::{DEFAULT_KV_SEPARATOR, DEFAULT_MARKER, DEFAULT_SEPARATOR, PII_FIELDS};
use piiguard_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Configuration for the redactor.
///
/// Immutable once handed to a [`crate::Redactor`] or
/// [`crate::RedactingFormatter`]. Keys missing from a JSON document take
/// their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Field names whose values are replaced.
    pub fields: BTreeSet<String>,
    /// Replacement written in place of a redacted value.
    pub marker: String,
    /// Separator between fields.
    pub separator: String,
    /// Separator between a key and its value.
    pub kv_separator: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            fields: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
            marker: DEFAULT_MARKER.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            kv_separator: DEFAULT_KV_SEPARATOR.to_string(),
        }
    }
}

impl RedactionConfig {
    /// Default delimiters and marker, redacting the given fields.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check that the delimiters and marker are usable.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(Error::Config("field separator must not be empty".into()));
        }
        if self.kv_separator.is_empty() {
            return Err(Error::Config("key-value separator must not be empty".into()));
        }
        if self.separator == self.kv_separator {
            return Err(Error::Config(format!(
                "field and key-value separators must differ (both {:?})",
                self.separator
            )));
        }
        if self.marker.is_empty() {
            return Err(Error::Config("redaction marker must not be empty".into()));
        }
        if self.marker.contains(&self.separator) {
            return Err(Error::Config(format!(
                "redaction marker {:?} must not contain the field separator",
                self.marker
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RedactionConfig::default();
        assert_eq!(config.fields.len(), 5);
        assert!(config.fields.contains("ssn"));
        assert_eq!(config.marker, "***");
        assert_eq!(config.separator, ";");
        assert_eq!(config.kv_separator, "=");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_fields() {
        let config = RedactionConfig::with_fields(["email", "ssn"]);
        assert_eq!(
            config.fields.iter().cloned().collect::<Vec<_>>(),
            vec!["email".to_string(), "ssn".to_string()]
        );
        assert_eq!(config.marker, DEFAULT_MARKER);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RedactionConfig::from_json(r#"{"fields": ["token"], "marker": "[X]"}"#)
            .unwrap();
        assert_eq!(config.fields.len(), 1);
        assert!(config.fields.contains("token"));
        assert_eq!(config.marker, "[X]");
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
    }

    #[test]
    fn test_from_json_rejects_empty_separator() {
        let err = RedactionConfig::from_json(r#"{"separator": ""}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = RedactionConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_validate_rejects_marker_with_separator() {
        let config = RedactionConfig {
            marker: "a;b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_identical_separators() {
        let config = RedactionConfig {
            kv_separator: ";".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = RedactionConfig::from_file(Path::new("/nonexistent/piiguard.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
