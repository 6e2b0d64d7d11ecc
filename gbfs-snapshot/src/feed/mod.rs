//! GBFS feed client.
//!
//! Fetches the station information and station status documents of a
//! bike-share system over HTTPS. Each request carries its own retry budget:
//! up to five attempts, with exponential backoff between them, for
//! connection failures and for 500/502/504 responses.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod retry;

pub use client::{FeedClient, FeedConfig, FeedDocument};
pub use error::FeedError;
pub use retry::{RetryPolicy, retry_after};
