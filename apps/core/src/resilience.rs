//! Timeout, retry and backoff guard for every external-service call.
//!
//! Each attempt runs on its own spawned task and is raced against a timer. When the
//! timer wins, the task handle is dropped: the attempt is abandoned, not cancelled, and
//! may keep running in the background. Callers must treat the returned result as final.

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::AppError;

/// Default per-attempt timeout for calls without a dedicated budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);
/// Default retry count for calls without a dedicated budget.
pub const DEFAULT_RETRIES: u32 = 2;
/// First backoff delay; doubled on every further attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);
/// Upper bound on any single backoff delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(5_000);

/// Budget applied to one guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self {
            timeout,
            retries,
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Total number of attempts, the first call included.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay to wait after the zero-based `attempt` failed: `min(max, base * 2^attempt)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Longest time a guarded call can take: every attempt timing out plus every backoff.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.attempts();
        let waiting: Duration = (0..attempts.saturating_sub(1)).map(|a| self.backoff_delay(a)).sum();
        self.timeout.saturating_mul(attempts).saturating_add(waiting)
    }
}

/// Runs the operation produced by `factory` under `policy`.
///
/// `factory` is called once per attempt so every retry starts a fresh operation.
/// Attempts run one after another, never concurrently. After the last attempt the last
/// failure is returned unchanged.
pub async fn with_retry<T, F, Fut>(label: &str, policy: &RetryPolicy, mut factory: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    let attempts = policy.attempts();
    let mut last_error = AppError::Internal(format!("{}: no attempt was made", label));

    for attempt in 0..attempts {
        info!("{} - Attempt {}/{}", label, attempt + 1, attempts);

        let handle = tokio::spawn(factory());
        let outcome = match tokio::time::timeout(policy.timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(AppError::from(join_error)),
            Err(_) => Err(AppError::Timeout(format!(
                "{} timed out after {}ms (attempt {}/{})",
                label,
                policy.timeout.as_millis(),
                attempt + 1,
                attempts
            ))),
        };

        match outcome {
            Ok(value) => {
                info!("{} - Success on attempt {}", label, attempt + 1);
                return Ok(value);
            }
            Err(e) => {
                last_error = e;
                if attempt + 1 < attempts {
                    let delay = policy.backoff_delay(attempt);
                    warn!(
                        "{} - Attempt {} failed: {}. Retrying in {}ms",
                        label,
                        attempt + 1,
                        last_error,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    error!("{} - All {} attempts failed: {}", label, attempts, last_error);
    Err(last_error)
}
