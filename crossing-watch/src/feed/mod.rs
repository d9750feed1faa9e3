//! Crossing feed: base location listing and per-crossing live state.
//!
//! The feed exposes two endpoints:
//! - `/location` lists every monitored crossing with its coordinates
//! - `/state/{id}` returns whether that crossing is blocked and when it
//!   last changed (epoch seconds)
//!
//! [`CrossingSource`] abstracts over the two so the enrichment pipeline can
//! run against the real service or the in-memory mock.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

use crate::domain::CrossingId;

pub use client::{DEFAULT_BASE_URL, FeedClient, FeedConfig};
pub use error::FeedError;
pub use mock::MockFeed;
pub use types::{LocationDto, StateDto, decode_listing};

/// Trait for providing crossing data.
///
/// This abstraction allows the enricher to be tested with mock data.
pub trait CrossingSource: Send + Sync {
    /// Fetch the base listing of crossings.
    fn fetch_locations(&self) -> impl Future<Output = Result<Vec<LocationDto>, FeedError>> + Send;

    /// Fetch the live state of one crossing.
    fn fetch_state(
        &self,
        id: &CrossingId,
    ) -> impl Future<Output = Result<StateDto, FeedError>> + Send;
}
