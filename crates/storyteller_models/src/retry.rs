//! Fixed-interval bounded retry.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyteller_error::{StorytellerError, StorytellerResult};
use storyteller_interface::RetryCallback;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{RetryError, RetryIf};
use tracing::warn;

/// A fixed number of attempts separated by a fixed delay.
///
/// No jitter and no growth. Only retryable errors (see
/// [`StorytellerError::is_retryable`]) lead to another attempt; anything else
/// is returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct BoundedRetry {
    /// Total attempts, including the first
    max_attempts: u32,
    /// Delay before each follow-up attempt
    backoff: Duration,
}

impl Default for BoundedRetry {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl BoundedRetry {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    fn strategy(&self) -> std::iter::Take<FixedInterval> {
        FixedInterval::new(self.backoff).take(self.max_attempts as usize - 1)
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// `operation` receives the 1-based attempt number. After a retryable
    /// failure that will be followed by another attempt, `on_retry` is called
    /// with the number of the failed attempt and the delay starts.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt made.
    pub async fn run<T, F, Fut>(
        &self,
        mut operation: F,
        on_retry: RetryCallback<'_>,
    ) -> StorytellerResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = StorytellerResult<T>>,
    {
        let attempts = AtomicU32::new(0);
        let max_attempts = self.max_attempts;

        let action = || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = operation(attempt);
            async move {
                outcome.await.map_err(|e| {
                    if e.is_retryable() && attempt < max_attempts {
                        RetryError::Transient {
                            err: e,
                            retry_after: None,
                        }
                    } else {
                        warn!(attempt, error = %e, "Giving up");
                        RetryError::Permanent(e)
                    }
                })
            }
        };

        let notify = |e: &StorytellerError, delay: Duration| {
            let failed = attempts.load(Ordering::SeqCst);
            warn!(attempt = failed, max_attempts, ?delay, error = %e, "Attempt failed, retrying");
            on_retry(failed);
        };

        RetryIf::spawn(self.strategy(), action, |_: &StorytellerError| true, notify).await
    }
}
