//! Snapshot key taken from the status feed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Name of the feed-wide timestamp field in GBFS documents.
pub const LAST_UPDATED: &str = "last_updated";

/// Errors extracting the snapshot timestamp from a status document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The document has no `last_updated` field
    #[error("status document has no `last_updated` field")]
    Missing,

    /// The field exists but can't be used as a file key
    #[error("status document has an unusable `last_updated` value: {0}")]
    Invalid(String),
}

/// The `last_updated` value of a station status document.
///
/// Kept exactly as the feed renders it (an epoch integer in GBFS 1.x/2.x, an
/// RFC 3339 string in 3.x), since it becomes the prefix of both snapshot
/// file names.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FeedTimestamp(String);

impl FeedTimestamp {
    /// Read `last_updated` from a parsed status document.
    pub fn from_status(document: &Value) -> Result<Self, TimestampError> {
        let value = document.get(LAST_UPDATED).ok_or(TimestampError::Missing)?;

        match value {
            Value::Number(n) => Ok(FeedTimestamp(n.to_string())),
            Value::String(s) => Self::from_text(s),
            Value::Null => Err(TimestampError::Invalid("null".to_string())),
            Value::Bool(b) => Err(TimestampError::Invalid(b.to_string())),
            Value::Array(_) => Err(TimestampError::Invalid("array".to_string())),
            Value::Object(_) => Err(TimestampError::Invalid("object".to_string())),
        }
    }

    fn from_text(s: &str) -> Result<Self, TimestampError> {
        if s.is_empty() {
            return Err(TimestampError::Invalid("empty string".to_string()));
        }
        if s == "." || s == ".." || s.contains(['/', '\\', '\0']) {
            return Err(TimestampError::Invalid(format!("{s:?}")));
        }
        Ok(FeedTimestamp(s.to_string()))
    }

    /// Returns the timestamp as it appears in file names.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the timestamp as a point in time, if it has a known shape.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        if let Ok(secs) = self.0.parse::<i64>() {
            return DateTime::from_timestamp(secs, 0);
        }
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Debug for FeedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedTimestamp({})", self.0)
    }
}

impl fmt::Display for FeedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
