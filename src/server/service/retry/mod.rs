//! Bounded retry with exponential backoff for transient failures.

use std::time::Duration;

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Context for service methods providing retry logic
///
/// `T` is state carried between attempts, letting an operation keep work done by an earlier
/// attempt. Most callers use `()`.
pub struct RetryContext<T> {
    /// State shared between attempts
    state: T,
    /// Max attempts before failure
    max_attempts: u32,
    /// Backoff before the first retry, doubled for each following retry
    initial_backoff: Duration,
}

impl<T> RetryContext<T>
where
    T: Default,
{
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::with_policy(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_INITIAL_BACKOFF)
    }

    pub fn with_policy(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            state: T::default(),
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Execute an operation with automatic retry logic
    ///
    /// Errors whose [`Error::to_retry_strategy`] is [`ErrorRetryStrategy::Retry`] are retried
    /// until `max_attempts` is reached, any other error is returned immediately.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "get user ID 1")
    /// - `operation`: Async function receiving the state shared between attempts
    pub async fn execute_with_retry<R, F>(
        &mut self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: for<'a> Fn(
            &'a mut T,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<R, Error>> + Send + 'a>,
        >,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation(&mut self.state).await {
                Ok(result) => return Ok(result),
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::debug!("Permanent error for {}: {}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff = self.initial_backoff * 2_u32.pow(attempt_count - 1);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl<T: Default> Default for RetryContext<T> {
    fn default() -> Self {
        Self::new()
    }
}
