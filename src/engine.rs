//! Fibonacci computation with a fixed `u64` domain.
//!
//! The sequence is 0-indexed: `fib(0) = 0`, `fib(1) = 1`. Values are
//! accumulated iteratively and every addition is checked, so an index
//! outside the representable domain yields [`FibonacciError::Overflow`]
//! instead of a wrapped value.

use thiserror::Error;

/// Largest index whose Fibonacci number fits in a `u64`.
///
/// `fib(93) = 12200160415121876738`; `fib(94)` exceeds `u64::MAX`.
pub const MAX_INDEX: u64 = 93;

/// Error type for Fibonacci computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FibonacciError {
    #[error("unsupported fibonacci number {n}: too large")]
    Overflow { n: u64 },
}

/// Compute the `n`-th Fibonacci number.
///
/// Runs in O(min(n, [`MAX_INDEX`])) time and constant space. Pure: the same
/// `n` always produces the same result.
///
/// # Errors
///
/// Returns [`FibonacciError::Overflow`] when `fib(n)` does not fit in a `u64`.
///
/// # Example
///
/// ```
/// use fib_telemetry::engine::fibonacci;
///
/// assert_eq!(fibonacci(10), Ok(55));
/// assert!(fibonacci(94).is_err());
/// ```
pub fn fibonacci(n: u64) -> Result<u64, FibonacciError> {
    if n <= 1 {
        return Ok(n);
    }

    let (mut prev, mut curr) = (0u64, 1u64);
    for _ in 1..n {
        let next = prev
            .checked_add(curr)
            .ok_or(FibonacciError::Overflow { n })?;
        prev = curr;
        curr = next;
    }

    Ok(curr)
}
