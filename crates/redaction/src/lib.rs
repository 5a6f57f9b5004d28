//! Field redaction for personal data in log lines.
//!
//! Log lines are sequences of `key=value` fields joined by a separator
//! (`name=Bob;email=bob@x.com;`). This crate replaces the values of
//! designated fields with a marker before the line is emitted, either
//! directly through [`redact`] or through the [`RedactingFormatter`]
//! plugged into a `tracing` subscriber.

pub mod config;
pub mod formatter;
pub mod redactor;

pub use config::RedactionConfig;
pub use formatter::{RedactingFormatter, USER_DATA_TARGET};
pub use redactor::{compose_line, redact, FieldSet, RedactionResult, RedactionStats, Redactor};

/// Fields treated as personally identifiable by default.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Default placeholder for redacted values.
pub const DEFAULT_MARKER: &str = "***";

/// Default separator between fields.
pub const DEFAULT_SEPARATOR: &str = ";";

/// Default separator between a field's key and its value.
pub const DEFAULT_KV_SEPARATOR: &str = "=";
