//! Retry loop: run a closure until success or the attempt budget is spent.

use super::error::SegmentError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the policy says to stop, sleeping the backoff
/// delay between attempts. `f` receives the 1-based attempt number.
/// Blocks the calling thread; run it on a blocking-capable thread.
pub fn run_with_retry<F>(policy: &RetryPolicy, mut f: F) -> Result<(), SegmentError>
where
    F: FnMut(u32) -> Result<(), SegmentError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(()) => return Ok(()),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(SegmentError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(attempt, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
