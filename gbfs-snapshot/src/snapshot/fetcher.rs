//! Snapshot fetcher.
//!
//! One run captures one network: prepare its directory, fetch both feed
//! documents, key the pair by the status document's `last_updated`, and
//! only then write the two files.

use std::path::PathBuf;

use tracing::info;

use crate::domain::{FeedTimestamp, Network};
use crate::feed::{FeedClient, FeedConfig, FeedDocument};

use super::error::SnapshotError;
use super::store::{DEFAULT_DATA_DIR, SnapshotFiles, SnapshotStore};

/// File name of the station information document.
pub const STATION_INFORMATION: &str = "station_information.json";

/// File name of the station status document.
pub const STATION_STATUS: &str = "station_status.json";

/// Configuration for a snapshot run.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Root under which `<network>/` directories are created
    pub data_dir: PathBuf,
    /// Feed root to use instead of the network's own (mirrors, testing)
    pub base_url: Option<String>,
    /// HTTP client settings
    pub feed: FeedConfig,
}

impl SnapshotConfig {
    /// Create a config writing under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            base_url: None,
            feed: FeedConfig::default(),
        }
    }

    /// Fetch from a custom feed root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set HTTP client settings.
    pub fn with_feed(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    /// The feed root for `network`, always ending in `/`.
    pub fn feed_base_url(&self, network: Network) -> String {
        match &self.base_url {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => network.feed_base_url(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// A completed snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub network: Network,
    pub timestamp: FeedTimestamp,
    pub files: SnapshotFiles,
}

/// Captures point-in-time snapshots of a network's feed.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    client: FeedClient,
    config: SnapshotConfig,
}

impl SnapshotFetcher {
    /// Create a fetcher, building its HTTP client.
    pub fn new(config: SnapshotConfig) -> Result<Self, SnapshotError> {
        let client = FeedClient::new(config.feed.clone())?;
        Ok(Self { client, config })
    }

    /// Parse `network` and take a snapshot of it.
    ///
    /// An unknown id fails before any directory or request is touched.
    pub async fn run_id(&self, network: &str) -> Result<Snapshot, SnapshotError> {
        let network = Network::parse(network)?;
        self.run(network).await
    }

    /// Take one snapshot of `network`.
    ///
    /// Either both files are written under the same timestamp, or an error
    /// is returned and nothing is written.
    pub async fn run(&self, network: Network) -> Result<Snapshot, SnapshotError> {
        let store = SnapshotStore::prepare(&self.config.data_dir, network)?;

        let base = self.config.feed_base_url(network);
        info!(network = %network, feed = %base, "fetching snapshot");

        let (stations, status) = self.fetch_documents(&base).await?;

        let timestamp = FeedTimestamp::from_status(&status.json)?;
        let files = store.write_pair(&timestamp, &stations.body, &status.body)?;

        match timestamp.as_datetime() {
            Some(updated) => info!(
                network = %network,
                timestamp = %timestamp,
                updated = %updated.to_rfc3339(),
                dir = %store.dir().display(),
                "snapshot written"
            ),
            None => info!(
                network = %network,
                timestamp = %timestamp,
                dir = %store.dir().display(),
                "snapshot written"
            ),
        }

        Ok(Snapshot {
            network,
            timestamp,
            files,
        })
    }

    /// Fetch station information and station status concurrently.
    ///
    /// Returns once both have succeeded, or with the first failure.
    async fn fetch_documents(
        &self,
        base: &str,
    ) -> Result<(FeedDocument, FeedDocument), SnapshotError> {
        let stations_url = format!("{base}{STATION_INFORMATION}");
        let status_url = format!("{base}{STATION_STATUS}");

        let (stations, status) = futures::try_join!(
            self.client.fetch(&stations_url),
            self.client.fetch(&status_url),
        )?;

        Ok((stations, status))
    }
}
