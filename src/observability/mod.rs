//! OpenTelemetry observability infrastructure.
//!
//! Provides:
//! - Structured tracing with optional OTLP export
//! - Span status helpers for failed operations

pub mod span;
pub mod tracing;
