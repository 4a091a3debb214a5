//! Retry with exponential backoff
//!
//! Every layer pipeline and the symbology update run under a
//! [`RetryPolicy`]. Attempts and delays come from `[retry]` in the
//! configuration.

use crate::config::RetryConfig;
use crate::domain::{Result, SyncError};
use std::future::Future;
use std::time::Duration;

/// Attempt count and backoff schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
        }
    }

    /// A policy that retries immediately, for tests
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Delay before the attempt that follows failure number `failures` (1-based)
    pub fn delay_after(&self, failures: usize) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as usize) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }

    /// Run `operation` until it succeeds or attempts run out
    ///
    /// The last error is returned unchanged once every attempt has failed.
    pub async fn retry<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut failures = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    failures += 1;
                    if failures >= self.max_attempts {
                        return Err(e);
                    }

                    let delay = self.delay_after(failures);
                    log_retry(operation_name, failures, self.max_attempts, delay, &e);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

fn log_retry(
    operation_name: &str,
    attempt: usize,
    max_attempts: usize,
    delay: Duration,
    error: &SyncError,
) {
    tracing::warn!(
        operation = operation_name,
        attempt = attempt,
        max_attempts = max_attempts,
        delay_ms = delay.as_millis() as u64,
        error = %error,
        "Retrying operation after error"
    );
}
