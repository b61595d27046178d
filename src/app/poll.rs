//! Request polling.
//!
//! Prompts on the output sink, then reads one line from the input and parses
//! it as a base-10 `u64`. There is no retry: every failure is returned to the
//! caller as-is.

use std::io::{self, BufRead, Write};
use std::num::ParseIntError;

use thiserror::Error;
use tracing::Span;

use crate::observability::span::record_failure;

/// Prompt written before every read.
pub const PROMPT: &str = "What Fibonacci number would you like to know: ";

/// Error type for polling a request.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("invalid request '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("end of input")]
    EndOfInput,

    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
}

impl PollError {
    /// Whether this error is the expected end of the input stream.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

/// Ask for the next Fibonacci index and read it from `reader`.
///
/// Opens a `Poll` span under `parent`. The parsed value is recorded on it as
/// `request.n`; parse and read failures mark it failed. End of input is not
/// treated as a failure.
pub fn poll<R, W>(reader: &mut R, writer: &mut W, parent: &Span) -> Result<u64, PollError>
where
    R: BufRead,
    W: Write,
{
    let span = tracing::info_span!(
        parent: parent,
        "Poll",
        request.n = tracing::field::Empty,
        otel.status_code = tracing::field::Empty,
        otel.status_message = tracing::field::Empty,
    );
    let _enter = span.enter();

    match read_request(reader, writer) {
        Ok(n) => {
            // Stored as a string so values above i64::MAX survive export.
            span.record("request.n", n.to_string().as_str());
            tracing::debug!(n, "Request received");
            Ok(n)
        }
        Err(PollError::EndOfInput) => {
            tracing::debug!("Input exhausted");
            Err(PollError::EndOfInput)
        }
        Err(e) => {
            record_failure(&span, &e);
            Err(e)
        }
    }
}

fn read_request<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, PollError>
where
    R: BufRead,
    W: Write,
{
    writeln!(writer, "{PROMPT}")?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PollError::EndOfInput);
    }

    let token = line.trim();
    token.parse::<u64>().map_err(|source| PollError::Parse {
        input: token.to_string(),
        source,
    })
}
