//! Span status helpers.
//!
//! Spans that can fail declare `otel.status_code` and `otel.status_message`
//! as empty fields at creation; `tracing-opentelemetry` maps these onto the
//! exported span status.

use std::error::Error;
use tracing::Span;

/// Status code recorded on a failed span.
pub const STATUS_ERROR: &str = "ERROR";

/// Mark `span` as failed with `err`.
///
/// Sets the span status and emits an `error` event inside the span so the
/// error is attached to it as an exception record.
pub fn record_failure(span: &Span, err: &(dyn Error + 'static)) {
    let message = err.to_string();
    span.record("otel.status_code", STATUS_ERROR);
    span.record("otel.status_message", message.as_str());
    tracing::error!(parent: span, error = err, "{message}");
}
