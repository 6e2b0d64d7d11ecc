//! Feed client error types.

/// Errors from fetching a GBFS document.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Building the HTTP client failed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection or read failure that outlasted the retry budget
    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// Response body is not valid JSON
    #[error("{url} did not return valid JSON: {message}")]
    Json { url: String, message: String },
}

impl FeedError {
    /// The URL being fetched, if the error is tied to one request.
    pub fn url(&self) -> Option<&str> {
        match self {
            FeedError::Client(_) => None,
            FeedError::Transport { url, .. }
            | FeedError::Status { url, .. }
            | FeedError::Json { url, .. } => Some(url),
        }
    }
}
