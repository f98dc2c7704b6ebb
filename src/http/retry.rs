//! Retry policies for HTTP requests.
//!
//! Only the JSON endpoints retry. The k-line stream is opened exactly once per
//! subscription; a failure there is surfaced, never retried silently.

use crate::error::HttpError;
use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt.
    #[default]
    None,
    /// Retry on transport failures, timeouts, 429 and 502/503/504.
    /// Default for the GET endpoints.
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The effective config, or `None` for a single attempt.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            Self::None => None,
            Self::Idempotent => Some(RetryConfig::idempotent()),
            Self::Custom(config) => Some(config.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add ±25% jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// The config used for GET endpoints. Kept short: the transaction list is
    /// polled every second, so a long backoff only delays the next poll.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Whether `error` is worth another attempt under this config.
    pub fn should_retry(&self, error: &HttpError) -> bool {
        match error {
            HttpError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            HttpError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            HttpError::Timeout => true,
            HttpError::Reqwest(e) => e.is_connect(),
            _ => false,
        }
    }

    /// Delay before retrying `attempt` (0-indexed) after `error`.
    ///
    /// A server-provided `Retry-After` wins when it is longer than the backoff.
    pub fn delay_after(&self, attempt: u32, error: &HttpError) -> Duration {
        let backoff = self.delay_for_attempt(attempt);
        match error {
            HttpError::RateLimited {
                retry_after_ms: Some(ms),
            } => backoff.max(Duration::from_millis(*ms)),
            _ => backoff,
        }
    }

    /// Calculate delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}
