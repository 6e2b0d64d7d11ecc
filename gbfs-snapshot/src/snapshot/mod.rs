//! Snapshot capture and storage.
//!
//! A snapshot is the station information and station status documents of
//! one network, fetched together and written side by side under the status
//! feed's `last_updated` value.

mod error;
mod fetcher;
mod store;

pub use error::{ErrorKind, SnapshotError};
pub use fetcher::{
    STATION_INFORMATION, STATION_STATUS, Snapshot, SnapshotConfig, SnapshotFetcher,
};
pub use store::{DEFAULT_DATA_DIR, SnapshotFiles, SnapshotStore};
