//! Retry policy for feed requests.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Default total attempts per request (first try included).
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff factor in seconds.
const DEFAULT_BACKOFF_FACTOR: f64 = 0.3;

/// Default upper bound on any single delay.
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Server errors retried by default.
const DEFAULT_RETRY_STATUSES: [u16; 3] = [500, 502, 504];

/// Statuses retried only when the server sends `Retry-After`.
const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

/// How a single feed request is retried.
///
/// One policy applies to each request independently; attempts are never
/// shared between the station information and station status fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Seconds; the delay after the n-th failure is `factor * 2^(n-1)`.
    pub backoff_factor: f64,
    /// Status codes that are always retried.
    pub retry_statuses: Vec<u16>,
    /// Cap applied to every delay, including `Retry-After`.
    pub max_backoff: Duration,
    /// Whether to retry 413/429/503 responses carrying `Retry-After`, and
    /// wait as long as the header asks.
    pub respect_retry_after: bool,
}

impl RetryPolicy {
    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the backoff factor, in seconds.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Replace the set of always-retried statuses.
    pub fn with_retry_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }

    /// Set the delay cap.
    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }

    /// Enable or disable `Retry-After` handling.
    pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    /// Total attempts allowed, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether another attempt may follow `made` attempts.
    pub fn can_retry(&self, made: u32) -> bool {
        made < self.attempts()
    }

    /// Exponential delay after `failures` consecutive failed attempts.
    pub fn backoff(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(failures - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        self.clamp(secs)
    }

    /// Whether a response with this status should be tried again.
    pub fn is_retryable(&self, status: StatusCode, headers: &HeaderMap) -> bool {
        let code = status.as_u16();
        if self.retry_statuses.contains(&code) {
            return true;
        }
        self.respect_retry_after
            && RETRY_AFTER_STATUSES.contains(&code)
            && headers.contains_key(RETRY_AFTER)
    }

    /// Delay before the next attempt after a retryable response.
    ///
    /// Uses the server's `Retry-After` when honoured and parseable, and the
    /// exponential backoff otherwise.
    pub fn delay_after_response(&self, failures: u32, headers: &HeaderMap) -> Duration {
        if self.respect_retry_after
            && let Some(wait) = retry_after(headers, Utc::now())
        {
            return wait.min(self.max_backoff);
        }
        self.backoff(failures)
    }

    fn clamp(&self, secs: f64) -> Duration {
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs.min(self.max_backoff.as_secs_f64()))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            max_backoff: DEFAULT_MAX_BACKOFF,
            respect_retry_after: true,
        }
    }
}

/// Parse a `Retry-After` header: either delta-seconds or an HTTP date.
///
/// Dates in the past yield a zero delay.
pub fn retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}
