//! Retry and backoff policy for segment fetches.
//!
//! Every failure is retried until the attempt budget is spent. The wait before
//! attempt `n + 1` is `n` backoff units (linear), so the first retry waits one
//! unit, the second two, and so on.

mod error;
mod policy;
mod run;

pub use error::SegmentError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
