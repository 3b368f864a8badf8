//! Retry and backoff policy for description requests.

use std::time::Duration;

/// Default number of retry attempts for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default number of retry attempts for transient network errors.
pub const DEFAULT_NETWORK_RETRIES: u32 = 3;

/// Base delay for exponential backoff (1 second).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Maximum delay cap for exponential backoff (60 seconds).
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(60);

/// How many times to retry, and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub network_retries: u32,
    pub rate_limit_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            network_retries: DEFAULT_NETWORK_RETRIES,
            rate_limit_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_max: DEFAULT_BACKOFF_MAX,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            network_retries: 0,
            rate_limit_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.backoff_base, self.backoff_max)
    }

    /// Delay after a rate limit response. A server supplied `Retry-After`
    /// wins over the computed backoff, capped at `backoff_max`.
    pub fn rate_limit_delay(&self, retry_after_secs: Option<u64>, attempt: u32) -> Duration {
        match retry_after_secs {
            Some(secs) => Duration::from_secs(secs).min(self.backoff_max),
            None => self.backoff(attempt),
        }
    }
}

/// Whether a reqwest error is worth retrying: connection failures, timeouts,
/// interrupted bodies and gateway errors.
pub fn is_transient_network_error(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() || error.is_body() {
        return true;
    }
    matches!(error.status().map(|s| s.as_u16()), Some(502..=504))
}

/// Integer seconds from a `Retry-After` header, if present.
pub fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Exponential backoff: `min(base * 2^attempt + base/2, max)`, with the
/// added half-base term capped at 500ms.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let exponential = base.saturating_mul(2u32.saturating_pow(attempt));
    let jitter = Duration::from_millis((base.as_millis() as u64).min(1000) / 2);
    exponential.saturating_add(jitter).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_secs(1);
        let max = Duration::from_secs(60);
        assert_eq!(calculate_backoff(0, base, max), Duration::from_millis(1500));
        assert_eq!(calculate_backoff(1, base, max), Duration::from_millis(2500));
        assert_eq!(calculate_backoff(2, base, max), Duration::from_millis(4500));
    }

    #[test]
    fn backoff_respects_max() {
        let delay = calculate_backoff(30, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(delay, Duration::from_secs(60));
    }

    #[test]
    fn retry_after_wins_but_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_delay(Some(7), 3), Duration::from_secs(7));
        assert_eq!(policy.rate_limit_delay(Some(600), 0), DEFAULT_BACKOFF_MAX);
        assert_eq!(policy.rate_limit_delay(None, 0), policy.backoff(0));
    }

    #[test]
    fn none_policy_has_no_retries() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.network_retries, 0);
        assert_eq!(policy.rate_limit_retries, 0);
    }
}
