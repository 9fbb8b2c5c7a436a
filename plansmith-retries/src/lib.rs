//! # plansmith-retries
//!
//! Bounded retry with backoff for transient remote failures.
//!
//! Remote model calls can fail transiently (timeouts, rate limits, 5xx).
//! This crate provides a small retry executor driven by a backoff policy.
//! Errors opt into retrying by implementing [`Retryable`]; anything
//! non-retryable is returned immediately.
//!
//! ## Example
//!
//! ```rust,ignore
//! use plansmith_retries::{with_retry, ExponentialBackoff};
//!
//! let policy = ExponentialBackoff::builder().max_retries(2).build();
//! let result = with_retry(&policy, || async {
//!     client.request(&messages, &settings, &params).await
//! }).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod executor;

use std::time::Duration;

// Re-exports
pub use backoff::{ExponentialBackoff, ExponentialBackoffBuilder, FixedDelay};
pub use executor::with_retry;

/// Implemented by errors that know whether they are transient.
pub trait Retryable {
    /// Whether retrying could possibly succeed.
    fn is_retryable(&self) -> bool;

    /// Server-suggested wait before the next attempt, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Policy deciding whether and how long to wait before another attempt.
pub trait BackoffPolicy: Send + Sync {
    /// Return the delay before retrying `attempt` (1-indexed count of
    /// failures so far), or `None` to stop retrying.
    fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Option<Duration>;

    /// Maximum number of retries this policy allows.
    fn max_retries(&self) -> u32;
}
