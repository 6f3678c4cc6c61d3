use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Bounded retry with linear backoff.
///
/// The wait after failed attempt `n` is `n * step`; there is no wait after
/// the final attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub step: Duration,
}

/// Where a retried operation currently stands.
#[derive(Debug)]
pub enum RetryState<T, E> {
    /// About to run attempt `n` (1-based).
    Attempting(u32),
    /// Attempt `n` failed with `E`; waiting before attempt `n + 1`.
    Backoff(u32, E),
    Succeeded(T),
    /// Attempt `n` failed with `E` and no attempts remain.
    Failed(u32, E),
}

/// Every attempt failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            step,
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// Outcome of attempt `attempt`, as the next state.
    pub fn after_attempt<T, E>(&self, attempt: u32, outcome: Result<T, E>) -> RetryState<T, E> {
        match outcome {
            Ok(value) => RetryState::Succeeded(value),
            Err(err) if attempt < self.max_attempts => RetryState::Backoff(attempt, err),
            Err(err) => RetryState::Failed(attempt, err),
        }
    }

    /// Drive `op` through the state machine until it succeeds or runs out of attempts.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut state = RetryState::Attempting(1);
        loop {
            state = match state {
                RetryState::Attempting(attempt) => self.after_attempt(attempt, op(attempt).await),
                RetryState::Backoff(attempt, err) => {
                    let delay = self.delay(attempt);
                    warn!(attempt, error = %err, delay_ms = delay.as_millis() as u64, "attempt failed, backing off");
                    tokio::time::sleep(delay).await;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Succeeded(value) => return Ok(value),
                RetryState::Failed(attempts, last) => {
                    warn!(attempts, error = %last, "giving up");
                    return Err(RetryExhausted { attempts, last });
                }
            };
        }
    }
}
