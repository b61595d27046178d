//! fib-telemetry: an interactive Fibonacci calculator traced with OpenTelemetry.
//!
//! Repeatedly prompts for an index, computes its Fibonacci number, and
//! prints the result, emitting a span tree for every request.
//!
//! # Modules
//!
//! - [`app`]: Read/compute/write loop with per-request spans
//! - [`config`]: CLI and environment configuration
//! - [`engine`]: Overflow-checked Fibonacci computation
//! - [`observability`]: Tracing setup and span helpers

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // engine::FibonacciError is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc,      // Error docs can be verbose
)]

pub mod app;
pub mod config;
pub mod engine;
pub mod observability;
