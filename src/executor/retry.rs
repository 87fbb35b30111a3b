//! Retry policy for rejected API calls.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for retrying calls the service rejects under load.
///
/// Pixela answers HTTP 503 with `isRejected: true` when it voluntarily
/// drops a request. Such calls are retried up to `max_retry` times with
/// exponential backoff; nothing else is retried.
///
/// # Defaults
///
/// - `max_retry`: 0 (a rejected call fails on the first attempt)
/// - `base_delay`: 100 milliseconds
///
/// # Backoff
///
/// After attempt `n` (0-indexed) the executor waits `0` when `n == 0`,
/// otherwise `2^n * base_delay`.
///
/// # Example
///
/// ```
/// use pixela::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retry(5)
///     .with_base_delay(Duration::from_millis(50));
///
/// assert_eq!(policy.max_attempts(), 6);
/// assert_eq!(policy.delay_for_retry(0), Duration::ZERO);
/// assert_eq!(policy.delay_for_retry(2), Duration::from_millis(200));
///
/// // Out-of-range values are clamped rather than rejected.
/// assert_eq!(RetryPolicy::new().with_max_retry(-3).max_retry(), 0);
/// assert_eq!(RetryPolicy::new().with_max_retry(99).max_retry(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RetryPolicyConfig")]
pub struct RetryPolicy {
    max_retry: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRY: u32 = 0;

    /// Upper bound for `max_retry`.
    pub const MAX_RETRY_LIMIT: u32 = 20;

    /// Default base delay (100 milliseconds).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retry: Self::DEFAULT_MAX_RETRY,
            base_delay: Self::DEFAULT_BASE_DELAY,
        }
    }

    /// Sets the maximum number of retries, clamped into `[0, 20]`.
    #[must_use]
    pub const fn with_max_retry(mut self, max_retry: i64) -> Self {
        self.max_retry = Self::clamp_max_retry(max_retry);
        self
    }

    /// Sets the base delay used for backoff.
    ///
    /// Zero delay is supported but produces a tight retry loop.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns the configured number of retries.
    #[must_use]
    pub const fn max_retry(&self) -> u32 {
        self.max_retry
    }

    /// Returns the configured base delay.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Total requests a fully rejected call will send.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retry + 1
    }

    /// Clamps a requested retry count into `[0, MAX_RETRY_LIMIT]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamp_max_retry(requested: i64) -> u32 {
        if requested <= 0 {
            0
        } else if requested >= Self::MAX_RETRY_LIMIT as i64 {
            Self::MAX_RETRY_LIMIT
        } else {
            // In range (0, 20): the cast cannot truncate.
            requested as u32
        }
    }

    /// Computes the wait after the given attempt (0-indexed).
    ///
    /// The first retry happens immediately; later ones wait
    /// `2^attempt * base_delay`.
    #[must_use]
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Returns true if another attempt may follow the given attempt (0-indexed).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of [`RetryPolicy`], as found in an embedding
/// application's own configuration file.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct RetryPolicyConfig {
    max_retry: i64,
    base_delay_ms: u64,
}

impl Default for RetryPolicyConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            max_retry: i64::from(RetryPolicy::DEFAULT_MAX_RETRY),
            base_delay_ms: RetryPolicy::DEFAULT_BASE_DELAY.as_millis() as u64,
        }
    }
}

impl From<RetryPolicyConfig> for RetryPolicy {
    fn from(config: RetryPolicyConfig) -> Self {
        Self::new()
            .with_max_retry(config.max_retry)
            .with_base_delay(Duration::from_millis(config.base_delay_ms))
    }
}
