use std::time::Duration;

/// Configures timeouts and retry behavior for a single client instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of attempts for consistency retries, including the
    /// first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Base consistency retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Upper bound for a single backoff wait in milliseconds.
    pub max_backoff_ms: u64,
    /// Optional bound on the total time spent retrying one operation.
    pub max_retry_elapsed_ms: Option<u64>,
    /// Retries after transport failures (connect errors, timeouts).
    /// Independent of consistency retries.
    pub transport_retries: u32,
    /// Disables consistency retries entirely.
    pub disable_retries: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 8,
            retry_backoff_ms: 2_000,
            max_backoff_ms: 30_000,
            max_retry_elapsed_ms: None,
            transport_retries: 0,
            disable_retries: false,
        }
    }
}

impl ClientOptions {
    pub(crate) fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (0-based), capped at `max_backoff_ms`.
    pub(crate) fn backoff_for(&self, retry: u32) -> Duration {
        let exp = retry.min(16);
        let multiplier = 1u64 << exp;
        let delay_ms = self
            .retry_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay_ms)
    }

    pub(crate) fn retry_elapsed_limit(&self) -> Option<Duration> {
        self.max_retry_elapsed_ms.map(Duration::from_millis)
    }
}
