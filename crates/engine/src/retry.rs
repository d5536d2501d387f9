//! Retry combinator with linear backoff and cancellation.

use std::future::Future;
use std::time::Duration;

use docroute_core::error::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How many times to try, and how long to wait between tries.
///
/// Attempt `n` (1-based) that fails waits `n * backoff` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

/// What a retried operation ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { attempts: u32, last_error: String },
}

/// Run `op` until it succeeds or the policy's attempts run out.
///
/// `op` receives the 1-based attempt number and reports a transient failure
/// as `Err(reason)`. The only error this returns is [`Error::Cancelled`]:
/// the token is raced against every attempt and every backoff wait.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<RetryOutcome<T>, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = op(attempt) => result,
        };

        match result {
            Ok(value) => return Ok(RetryOutcome::Succeeded { value, attempts: attempt }),
            Err(reason) => {
                warn!(attempt, max_attempts = policy.max_attempts, error = %reason, "Attempt failed");
                last_error = reason;
            }
        }

        if attempt < policy.max_attempts {
            let delay = policy.delay_for(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off before retry");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    Ok(RetryOutcome::Exhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}
