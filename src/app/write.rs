//! Result output.
//!
//! Computes the requested value inside a `Fibonacci` span and writes either
//! `Fibonacci(n) = value` or `Fibonacci(n): error` to the output sink.

use std::io::{self, Write};

use tracing::Span;

use crate::engine::{fibonacci, FibonacciError};
use crate::observability::span::record_failure;

/// Compute `fib(n)` and write the outcome to `writer`.
///
/// Opens a `Write` span under `parent` with a `Fibonacci` child around the
/// computation. An overflow is reported on the sink and on the `Fibonacci`
/// span; only a failing sink returns an error.
pub fn write<W: Write>(writer: &mut W, parent: &Span, n: u64) -> io::Result<()> {
    let span = tracing::info_span!(parent: parent, "Write", request.n = n);
    let _enter = span.enter();

    match compute(&span, n) {
        Ok(value) => writeln!(writer, "Fibonacci({n}) = {value}")?,
        Err(e) => writeln!(writer, "Fibonacci({n}): {e}")?,
    }
    writer.flush()
}

fn compute(parent: &Span, n: u64) -> Result<u64, FibonacciError> {
    let span = tracing::info_span!(
        parent: parent,
        "Fibonacci",
        otel.status_code = tracing::field::Empty,
        otel.status_message = tracing::field::Empty,
    );
    let _enter = span.enter();

    let result = fibonacci(n);
    if let Err(e) = &result {
        record_failure(&span, e);
    }
    result
}
