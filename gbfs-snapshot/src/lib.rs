//! GBFS station feed snapshotter.
//!
//! Captures the station information and station status feeds of a
//! bike-share system as a pair of JSON files, keyed by the feed's own
//! `last_updated` timestamp. One invocation takes one snapshot.

pub mod cli;
pub mod domain;
pub mod feed;
pub mod snapshot;
