//! Domain types for the snapshot fetcher.
//!
//! Both types validate at construction, so code that receives a `Network`
//! or a `FeedTimestamp` can use it to build URLs and file names directly.

mod network;
mod timestamp;

pub use network::{InvalidNetwork, Network};
pub use timestamp::{FeedTimestamp, LAST_UPDATED, TimestampError};
