//! Main redactor implementation.

use crate::config::RedactionConfig;
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};
use tracing::{debug, trace};

/// A set of field names to redact.
pub trait FieldSet {
    /// Whether values under `key` must be redacted.
    fn contains_field(&self, key: &str) -> bool;
}

impl<S: AsRef<str>> FieldSet for [S] {
    fn contains_field(&self, key: &str) -> bool {
        self.iter().any(|f| f.as_ref() == key)
    }
}

impl<S: AsRef<str>, const N: usize> FieldSet for [S; N] {
    fn contains_field(&self, key: &str) -> bool {
        self.as_slice().contains_field(key)
    }
}

impl<S: AsRef<str>> FieldSet for Vec<S> {
    fn contains_field(&self, key: &str) -> bool {
        self.as_slice().contains_field(key)
    }
}

impl<S, H> FieldSet for HashSet<S, H>
where
    S: Borrow<str> + Hash + Eq,
    H: BuildHasher,
{
    fn contains_field(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl<S: Borrow<str> + Ord> FieldSet for BTreeSet<S> {
    fn contains_field(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// Result of redaction.
#[derive(Debug)]
pub struct RedactionResult {
    /// The redacted content.
    pub content: String,
    /// Statistics about what was redacted.
    pub stats: RedactionStats,
}

/// Statistics about redactions performed.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RedactionStats {
    /// Number of field values replaced.
    pub fields_redacted: usize,
    /// Total characters redacted.
    pub total_chars_redacted: usize,
    /// Names of fields that matched, in order of first appearance.
    pub matched_fields: Vec<String>,
}

impl RedactionStats {
    /// Total number of redactions.
    pub fn total(&self) -> usize {
        self.fields_redacted
    }

    /// Merge with another stats.
    pub fn merge(&mut self, other: &RedactionStats) {
        self.fields_redacted += other.fields_redacted;
        self.total_chars_redacted += other.total_chars_redacted;
        for name in &other.matched_fields {
            self.record_match(name);
        }
    }

    fn record_match(&mut self, name: &str) {
        if !self.matched_fields.iter().any(|m| m == name) {
            self.matched_fields.push(name.to_string());
        }
    }
}

/// Replace the values of `fields` in `line` with `marker`.
///
/// The line is split on every `separator`, each field on the first
/// `kv_separator` only, so values may themselves contain the key-value
/// separator. Keys are compared with surrounding whitespace ignored.
/// Fields without a key-value separator, and everything not named in
/// `fields`, are copied verbatim. This never fails: an empty `separator`
/// treats the whole line as a single field and an empty `kv_separator`
/// leaves the line untouched.
///
/// Redacting an already redacted line is a no-op as long as `marker` does
/// not contain `separator`; [`RedactionConfig::validate`] enforces that for
/// configured redactors.
pub fn redact<F: FieldSet + ?Sized>(
    line: &str,
    fields: &F,
    marker: &str,
    separator: &str,
    kv_separator: &str,
) -> String {
    let mut stats = RedactionStats::default();
    redact_fields(line, fields, marker, separator, kv_separator, &mut stats)
}

pub(crate) fn redact_fields<F: FieldSet + ?Sized>(
    line: &str,
    fields: &F,
    marker: &str,
    separator: &str,
    kv_separator: &str,
    stats: &mut RedactionStats,
) -> String {
    if kv_separator.is_empty() {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len());
    if separator.is_empty() {
        push_field(&mut result, line, fields, marker, kv_separator, stats);
        return result;
    }

    for (i, field) in line.split(separator).enumerate() {
        if i > 0 {
            result.push_str(separator);
        }
        push_field(&mut result, field, fields, marker, kv_separator, stats);
    }
    result
}

fn push_field<F: FieldSet + ?Sized>(
    out: &mut String,
    field: &str,
    fields: &F,
    marker: &str,
    kv_separator: &str,
    stats: &mut RedactionStats,
) {
    match field.split_once(kv_separator) {
        Some((key, value)) if fields.contains_field(key.trim()) => {
            stats.fields_redacted += 1;
            stats.total_chars_redacted += value.len();
            stats.record_match(key.trim());

            out.push_str(key);
            out.push_str(kv_separator);
            out.push_str(marker);
        }
        _ => out.push_str(field),
    }
}

/// Build a log line from key/value pairs, terminating every field with
/// the separator.
pub fn compose_line<K, V>(pairs: &[(K, V)], separator: &str, kv_separator: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut line = String::new();
    for (key, value) in pairs {
        line.push_str(key.as_ref());
        line.push_str(kv_separator);
        line.push_str(value.as_ref());
        line.push_str(separator);
    }
    line
}

/// The main redactor.
#[derive(Debug, Clone)]
pub struct Redactor {
    config: RedactionConfig,
}

impl Redactor {
    /// Create a new redactor with default configuration.
    pub fn new() -> Self {
        Self::with_config(RedactionConfig::default())
    }

    /// Create a new redactor with custom configuration.
    pub fn with_config(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Redact the configured fields from a log line.
    pub fn redact(&self, line: &str) -> RedactionResult {
        let mut stats = RedactionStats::default();
        let content = redact_fields(
            line,
            &self.config.fields,
            &self.config.marker,
            &self.config.separator,
            &self.config.kv_separator,
            &mut stats,
        );

        if stats.total() > 0 {
            debug!(
                fields = stats.fields_redacted,
                chars = stats.total_chars_redacted,
                "Redacted log line"
            );
        } else {
            trace!("No fields redacted");
        }

        RedactionResult { content, stats }
    }

    /// Redact a single key-value pair.
    pub fn redact_key_value(&self, key: &str, value: &str) -> (String, RedactionStats) {
        let mut stats = RedactionStats::default();

        if self.config.fields.contains_field(key.trim()) {
            stats.fields_redacted += 1;
            stats.total_chars_redacted += value.len();
            stats.record_match(key.trim());
            return (self.config.marker.clone(), stats);
        }

        (value.to_string(), stats)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}
