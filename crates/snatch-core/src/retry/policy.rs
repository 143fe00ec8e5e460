use crate::config::SnatchConfig;
use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff policy with a fixed attempt budget.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts per segment, including the first.
    pub max_attempts: u32,
    /// One backoff unit; the n-th retry waits `n` units.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &SnatchConfig) -> Self {
        Self {
            max_attempts: cfg.retry_attempts,
            backoff_unit: Duration::try_from_secs_f64(cfg.retry_backoff_secs.max(0.0))
                .unwrap_or(Duration::MAX),
        }
    }

    /// Attempt budget actually used: a policy of zero still makes one attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Decide what to do after `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.attempts() {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff_unit.saturating_mul(attempt))
    }
}
