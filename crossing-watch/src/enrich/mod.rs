//! Crossing enrichment.
//!
//! Turns the feed's bare location listing into crossings carrying live
//! blocked/clear state and display times.

mod config;
mod pipeline;

pub use config::EnrichConfig;
pub use pipeline::{CrossingEnricher, EnrichError, EnrichmentItemError, EnrichmentReport};
