//! Snapshot run error types.

use std::path::PathBuf;

use crate::domain::{InvalidNetwork, TimestampError};
use crate::feed::FeedError;

/// Broad failure categories, for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognised network selector
    Usage,
    /// Directory creation or file write failed
    Filesystem,
    /// Connection or read failure after retries
    Network,
    /// Non-success HTTP status
    Http,
    /// Body not JSON, or no usable timestamp
    Data,
}

/// Errors that abort a snapshot run.
///
/// Every variant aborts the run; none leave a partial snapshot behind.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    InvalidNetwork(#[from] InvalidNetwork),

    #[error("failed to create snapshot directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

impl SnapshotError {
    /// Which category this failure falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnapshotError::InvalidNetwork(_) => ErrorKind::Usage,
            SnapshotError::CreateDir { .. } | SnapshotError::Write { .. } => ErrorKind::Filesystem,
            SnapshotError::Feed(FeedError::Client(_) | FeedError::Transport { .. }) => {
                ErrorKind::Network
            }
            SnapshotError::Feed(FeedError::Status { .. }) => ErrorKind::Http,
            SnapshotError::Feed(FeedError::Json { .. }) | SnapshotError::Timestamp(_) => {
                ErrorKind::Data
            }
        }
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage => 2,
            _ => 1,
        }
    }
}
