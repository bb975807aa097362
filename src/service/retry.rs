use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;

/// Bounded retry with exponential backoff for platform deliveries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Must be at least 1.
    pub attempts: u32,
    /// Delay before the second attempt; doubles per retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

/// Runs `op` until it succeeds, fails terminally, or the policy is exhausted.
///
/// Non-retryable errors (see [`AppError::is_retryable`]) are returned as-is
/// on the first occurrence. Exhaustion is reported as
/// [`AppError::DeliveryFailed`] wrapping the last error.
///
/// # Arguments
/// - `policy`: Attempt count and backoff base
/// - `action`: Short description used in log lines
/// - `op`: The fallible operation, re-invoked per attempt
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    action: &str,
    mut op: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut delay = policy.base_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() => return Err(error),
            Err(error) => {
                if attempt >= policy.attempts {
                    warn!("{} failed after {} attempts: {}", action, attempt, error);
                    return Err(AppError::DeliveryFailed(format!("{action}: {error}")));
                }
                warn!(
                    "{} failed (attempt {} of {}): {}",
                    action, attempt, policy.attempts, error
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}
