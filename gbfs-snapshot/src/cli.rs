//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::Network;
use crate::feed::{FeedConfig, RetryPolicy};
use crate::snapshot::SnapshotConfig;

/// Save one snapshot of a bike-share system's GBFS station feeds.
///
/// Writes `<timestamp>_stations.json` and `<timestamp>_status.json` under
/// `<data-dir>/<network>/`, keyed by the status feed's `last_updated`.
#[derive(Parser, Debug)]
#[command(name = "gbfs-snapshot", version)]
pub struct Cli {
    /// Bike-share network to snapshot
    #[arg(value_enum)]
    pub network: Network,

    /// Root directory for snapshots
    #[arg(long, env = "GBFS_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Fetch from this feed root instead of https://gbfs.<network>.com/gbfs/en/
    #[arg(long)]
    pub base_url: Option<String>,

    /// Total attempts per request, including the first
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Backoff factor in seconds; retries wait factor * 2^(n-1)
    #[arg(long, default_value_t = 0.3)]
    pub backoff_factor: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Cli {
    /// Build the snapshot configuration these arguments describe.
    pub fn snapshot_config(&self) -> SnapshotConfig {
        let retry = RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_backoff_factor(self.backoff_factor);
        let feed = FeedConfig::new()
            .with_timeout(self.timeout_secs)
            .with_retry(retry);

        let config = SnapshotConfig::new(&self.data_dir).with_feed(feed);
        match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }
}
