//! `tracing` event formatter that redacts user data before it is written.
//!
//! Events emitted on the [`USER_DATA_TARGET`] target are rendered as
//!
//! ```text
//! [USER] user_data INFO 2024-01-31 12:00:00,123: name=***;email=***;ip=10.0.0.1;
//! ```
//!
//! with the configured fields replaced in both the event message and the
//! event's structured fields.

use crate::config::RedactionConfig;
use crate::redactor::{redact_fields, RedactionStats, Redactor};
use chrono::Utc;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Target under which user records are logged.
pub const USER_DATA_TARGET: &str = "user_data";

const LINE_PREFIX: &str = "[USER]";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Event formatter redacting a fixed set of fields.
#[derive(Debug, Clone)]
pub struct RedactingFormatter {
    redactor: Redactor,
}

impl RedactingFormatter {
    pub fn new(config: RedactionConfig) -> Self {
        Self {
            redactor: Redactor::with_config(config),
        }
    }

    pub fn config(&self) -> &RedactionConfig {
        self.redactor.config()
    }

    /// Render the body of a line: the message followed by the structured
    /// fields, each terminated by the separator.
    ///
    /// Values under a sensitive key are masked before joining, and the
    /// joined line is redacted as a whole, so a value smuggling in
    /// `;ssn=...` is caught as well.
    fn render_body(&self, collected: &CollectedFields) -> String {
        let config = self.config();
        let mut body = collected.message.clone();

        for (key, value) in &collected.fields {
            if !body.is_empty() && !body.ends_with(config.separator.as_str()) {
                body.push_str(&config.separator);
            }
            let (value, _) = self.redactor.redact_key_value(key, value);
            body.push_str(key);
            body.push_str(&config.kv_separator);
            body.push_str(&value);
            body.push_str(&config.separator);
        }

        let mut stats = RedactionStats::default();
        redact_fields(
            &body,
            &config.fields,
            &config.marker,
            &config.separator,
            &config.kv_separator,
            &mut stats,
        )
    }
}

impl<S, N> FormatEvent<S, N> for RedactingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut collected = CollectedFields::default();
        event.record(&mut collected);

        writeln!(
            writer,
            "{} {} {} {}: {}",
            LINE_PREFIX,
            meta.target(),
            meta.level(),
            Utc::now().format(TIMESTAMP_FORMAT),
            self.render_body(&collected)
        )
    }
}

/// Message and structured fields of a single event.
#[derive(Default)]
struct CollectedFields {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for CollectedFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}

/// A layer writing redacted user-data events to stderr.
pub fn layer<S>(formatter: RedactingFormatter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    layer_with_writer(formatter, std::io::stderr)
}

/// A layer writing redacted user-data events to `make_writer`.
///
/// Only events on [`USER_DATA_TARGET`] at INFO or above reach the
/// formatter.
pub fn layer_with_writer<S, W>(formatter: RedactingFormatter, make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .event_format(formatter)
        .with_filter(Targets::new().with_target(USER_DATA_TARGET, Level::INFO))
}

/// A standalone subscriber logging redacted user data to stderr.
pub fn user_data_subscriber(config: RedactionConfig) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(layer(RedactingFormatter::new(config)))
}
