//! GBFS feed HTTP client.
//!
//! Fetches one JSON document per call, retrying according to a
//! [`RetryPolicy`]. The raw body is kept alongside the parsed value so that
//! snapshots can be written byte-for-byte as received.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::FeedError;
use super::retry::RetryPolicy;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Per-attempt timeout in seconds (connect + response)
    pub timeout_secs: u64,
    /// Retry behaviour applied to each request
    pub retry: RetryPolicy,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl FeedConfig {
    /// Create a config with the default timeout and retry policy.
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A successfully fetched feed document.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    /// URL the document was fetched from
    pub url: String,
    /// HTTP status of the final response
    pub status: u16,
    /// Body exactly as received
    pub body: Vec<u8>,
    /// Parsed body
    pub json: Value,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Result of a single HTTP attempt.
enum Attempt {
    Success { status: StatusCode, body: Vec<u8> },
    RetryableStatus { status: StatusCode, headers: HeaderMap },
    FailedStatus(StatusCode),
    Transport(reqwest::Error),
}

/// GBFS feed client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self {
            http,
            retry: config.retry,
        })
    }

    /// The retry policy applied to each request.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// GET a JSON document, retrying transient failures.
    ///
    /// Connection, timeout and body-read failures are retried, as are
    /// statuses the policy marks retryable. Any other non-success status
    /// fails straight away. A body that isn't JSON is not retried.
    pub async fn fetch(&self, url: &str) -> Result<FeedDocument, FeedError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(url, attempt = attempts, "requesting feed document");

            let delay = match self.attempt(url).await {
                Attempt::Success { status, body } => {
                    let json = serde_json::from_slice(&body).map_err(|e| FeedError::Json {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;

                    debug!(url, attempts, bytes = body.len(), "fetched feed document");

                    return Ok(FeedDocument {
                        url: url.to_string(),
                        status: status.as_u16(),
                        body,
                        json,
                        attempts,
                    });
                }
                Attempt::FailedStatus(status) => {
                    return Err(FeedError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                        attempts,
                    });
                }
                Attempt::RetryableStatus { status, headers } => {
                    if !self.retry.can_retry(attempts) {
                        return Err(FeedError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                            attempts,
                        });
                    }
                    let delay = self.retry.delay_after_response(attempts, &headers);
                    warn!(
                        url,
                        attempt = attempts,
                        status = status.as_u16(),
                        delay_ms = delay.as_millis() as u64,
                        "retrying after server error"
                    );
                    delay
                }
                Attempt::Transport(source) => {
                    if !is_transient(&source) || !self.retry.can_retry(attempts) {
                        return Err(FeedError::Transport {
                            url: url.to_string(),
                            attempts,
                            source,
                        });
                    }
                    let delay = self.retry.backoff(attempts);
                    warn!(
                        url,
                        attempt = attempts,
                        error = %source,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transport error"
                    );
                    delay
                }
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Transport(e),
        };

        let status = response.status();

        if !status.is_success() {
            if self.retry.is_retryable(status, response.headers()) {
                return Attempt::RetryableStatus {
                    status,
                    headers: response.headers().clone(),
                };
            }
            return Attempt::FailedStatus(status);
        }

        match response.bytes().await {
            Ok(body) => Attempt::Success {
                status,
                body: body.to_vec(),
            },
            Err(e) => Attempt::Transport(e),
        }
    }
}

/// Connection, timeout and read errors are worth another try; builder and
/// redirect errors will fail the same way every time.
fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_builder() || err.is_redirect() {
        return false;
    }
    err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() || err.is_decode()
}
