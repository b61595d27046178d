//! Interactive read/compute/write loop.
//!
//! Every iteration opens a fresh root `Run` span and threads it explicitly
//! through [`poll::poll`] and [`write::write`]:
//!
//! ```text
//! Run ─┬─ Poll
//!      └─ Write ── Fibonacci
//! ```
//!
//! The loop ends on the first poll failure. Overflow is reported on the
//! output and the loop keeps prompting.

pub mod poll;
pub mod write;

use std::io::{self, BufRead, Write};

use thiserror::Error;

pub use self::poll::PollError;

/// Error that terminates [`App::run`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Fibonacci request loop over an input and an output stream.
pub struct App<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Create a new app reading requests from `reader` and writing to `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Poll for requests and write results until the input fails.
    ///
    /// Returns the number of completed requests once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Poll`] on a parse or read failure and
    /// [`RunError::Output`] if the output sink fails.
    pub fn run(&mut self) -> Result<u64, RunError> {
        let mut completed = 0u64;
        loop {
            match self.step() {
                Ok(()) => completed += 1,
                Err(RunError::Poll(PollError::EndOfInput)) => {
                    tracing::info!(requests = completed, "Input closed, stopping");
                    return Ok(completed);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run a single poll/compute/write cycle under its own root span.
    pub fn step(&mut self) -> Result<(), RunError> {
        let root = tracing::info_span!(parent: None, "Run");
        let _enter = root.enter();

        let n = poll::poll(&mut self.reader, &mut self.writer, &root)?;
        write::write(&mut self.writer, &root, n).map_err(RunError::Output)
    }

    /// Consume the app, returning the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
