//! Fixed-delay retry for gateway requests.
//!
//! Every failure is retried until the budget runs out; translating failures
//! into user messages happens before the error reaches this layer.

use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before each retry
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Total attempts including the first one
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// Returns the last error when every attempt failed.
pub async fn with_retry<T, E, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("Request succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < config.max_retries => {
                attempt += 1;
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    config.total_attempts(),
                    e,
                    config.delay
                );
                tokio::time::sleep(config.delay).await;
            }
            Err(e) => {
                tracing::error!("All {} attempts exhausted: {}", config.total_attempts(), e);
                return Err(e);
            }
        }
    }
}
