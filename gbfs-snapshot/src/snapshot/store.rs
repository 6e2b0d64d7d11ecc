//! On-disk snapshot layout.
//!
//! Snapshots for one network live flat in `<data_dir>/<network>/`, as
//! `<timestamp>_stations.json` and `<timestamp>_status.json`.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::domain::{FeedTimestamp, Network};

use super::error::SnapshotError;

/// Default root for all snapshot directories.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Paths of a written snapshot pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFiles {
    pub stations: PathBuf,
    pub status: PathBuf,
}

/// The snapshot directory of one network.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Ensure `<data_dir>/<network>` exists and return a store for it.
    ///
    /// Succeeds if the directory is already there.
    pub fn prepare(data_dir: impl AsRef<Path>, network: Network) -> Result<Self, SnapshotError> {
        let dir = data_dir.as_ref().join(network.as_str());

        std::fs::create_dir_all(&dir).map_err(|source| SnapshotError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// The network's snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stations_path(&self, timestamp: &FeedTimestamp) -> PathBuf {
        self.dir.join(format!("{timestamp}_stations.json"))
    }

    pub fn status_path(&self, timestamp: &FeedTimestamp) -> PathBuf {
        self.dir.join(format!("{timestamp}_status.json"))
    }

    /// Write both documents, replacing any existing pair with the same
    /// timestamp.
    ///
    /// Both bodies are first written to temporary files in the snapshot
    /// directory and only renamed into place once both are complete, so a
    /// failed write leaves neither file behind and never truncates an
    /// earlier pair.
    pub fn write_pair(
        &self,
        timestamp: &FeedTimestamp,
        stations: &[u8],
        status: &[u8],
    ) -> Result<SnapshotFiles, SnapshotError> {
        let files = SnapshotFiles {
            stations: self.stations_path(timestamp),
            status: self.status_path(timestamp),
        };

        let staged_stations = self.stage(&files.stations, stations)?;
        let staged_status = self.stage(&files.status, status)?;

        staged_status
            .persist(&files.status)
            .map_err(|e| SnapshotError::Write {
                path: files.status.clone(),
                source: e.error,
            })?;

        if let Err(e) = staged_stations.persist(&files.stations) {
            if let Err(remove) = std::fs::remove_file(&files.status) {
                warn!(
                    path = %files.status.display(),
                    error = %remove,
                    "failed to remove status file after stations rename failed"
                );
            }
            return Err(SnapshotError::Write {
                path: files.stations,
                source: e.error,
            });
        }

        Ok(files)
    }

    /// Write `contents` to a temporary file next to `target`.
    ///
    /// The file is deleted on drop unless persisted.
    fn stage(&self, target: &Path, contents: &[u8]) -> Result<NamedTempFile, SnapshotError> {
        let write_error = |source| SnapshotError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut file = NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        file.write_all(contents).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        Ok(file)
    }
}
