use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{warn, info, error};

use crate::models::{IdentityError, Result};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }
}

/// Retry a remote call with exponential backoff.
///
/// Only transient errors (see [`IdentityError::is_transient`]) are retried;
/// anything else is returned on the first failure.
pub async fn retry_with_backoff<F, T, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("Operation {} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!("Operation {} failed on attempt {}: {}", operation_name, attempt, e);
                sleep(calculate_delay(config, attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    error!("Operation {} failed after {} attempts: {}", operation_name, attempt, e);
                }
                return Err(e);
            }
        }
    }
}

fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let delay_ms = config.base_delay.as_millis() as f64
        * config.backoff_multiplier.powi((attempt - 1) as i32);

    Duration::from_millis(delay_ms as u64).min(config.max_delay)
}

/// Map a timeout from `tokio::time::timeout` into the crate error.
pub fn timeout_error(chain: &str) -> IdentityError {
    IdentityError::DataFetchTimeout {
        chain: chain.to_string(),
    }
}
