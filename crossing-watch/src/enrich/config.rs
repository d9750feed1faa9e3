//! Enrichment configuration.

use chrono::{FixedOffset, Local};

/// Default cap on concurrent state lookups.
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Configuration parameters for an enrichment pass.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Maximum number of state lookups outstanding at once.
    pub max_in_flight: usize,

    /// UTC offset used when formatting "since" times.
    pub display_offset: FixedOffset,
}

impl EnrichConfig {
    /// Create a configuration with the given concurrency cap.
    pub fn new(max_in_flight: usize, display_offset: FixedOffset) -> Self {
        Self {
            max_in_flight,
            display_offset,
        }
    }

    /// Set the concurrency cap.
    pub fn with_max_in_flight(mut self, n: usize) -> Self {
        self.max_in_flight = n;
        self
    }

    /// Set the display offset.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// The concurrency cap, never less than one.
    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight.max(1)
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            display_offset: *Local::now().offset(),
        }
    }
}
