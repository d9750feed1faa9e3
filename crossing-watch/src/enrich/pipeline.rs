//! Fetch-then-enrich pipeline.
//!
//! One pass pulls the base listing, then looks up every crossing's live state
//! with bounded concurrency. A failed listing fails the whole pass; a failed
//! lookup only leaves that one crossing `Unknown`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::{
    Crossing, CrossingId, CrossingLocation, Observation, TimeError, timestamp_from_epoch,
};
use crate::feed::{CrossingSource, FeedError, LocationDto};

use super::config::EnrichConfig;

/// Error that fails an enrichment pass.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// The base listing could not be fetched
    #[error("failed to fetch crossing list: {0}")]
    Fetch(#[source] FeedError),
}

/// Error enriching a single crossing. Never fails the pass.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentItemError {
    /// The state lookup failed
    #[error("state lookup for crossing {id} failed: {source}")]
    Lookup {
        id: CrossingId,
        #[source]
        source: FeedError,
    },

    /// The state carried a timestamp we cannot represent
    #[error("crossing {id} reported an unusable change time: {source}")]
    Timestamp {
        id: CrossingId,
        #[source]
        source: TimeError,
    },
}

impl EnrichmentItemError {
    /// The crossing this error belongs to.
    pub fn id(&self) -> &CrossingId {
        match self {
            EnrichmentItemError::Lookup { id, .. } | EnrichmentItemError::Timestamp { id, .. } => {
                id
            }
        }
    }
}

/// Result of a successful enrichment pass.
#[derive(Debug)]
pub struct EnrichmentReport {
    /// Every listed crossing, observed or `Unknown`. Order is unspecified.
    pub crossings: Vec<Crossing>,

    /// Lookups that failed, one per `Unknown` crossing.
    pub failures: Vec<EnrichmentItemError>,
}

impl EnrichmentReport {
    /// Number of crossings whose state is unknown.
    pub fn unknown_count(&self) -> usize {
        self.failures.len()
    }

    /// True if every crossing has an observed state.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches crossings and enriches them with live state.
pub struct CrossingEnricher<S> {
    source: Arc<S>,
    config: EnrichConfig,
}

impl<S: CrossingSource> CrossingEnricher<S> {
    /// Create an enricher over the given source.
    pub fn new(source: Arc<S>, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Run one enrichment pass, timing observations against the current time.
    pub async fn enrich(&self) -> Result<EnrichmentReport, EnrichError> {
        self.enrich_at(Utc::now()).await
    }

    /// Run one enrichment pass with an explicit "now".
    ///
    /// `now` is captured once so every duration in the pass is measured
    /// against the same instant.
    pub async fn enrich_at(&self, now: DateTime<Utc>) -> Result<EnrichmentReport, EnrichError> {
        let listing = self
            .source
            .fetch_locations()
            .await
            .map_err(EnrichError::Fetch)?;

        let bases = validate_listing(listing);
        let offset = self.config.display_offset;

        debug!(
            crossings = bases.len(),
            limit = self.config.in_flight_limit(),
            "Looking up crossing states"
        );

        let results: Vec<(CrossingLocation, Result<Observation, EnrichmentItemError>)> =
            stream::iter(bases)
                .map(|base| {
                    let source = Arc::clone(&self.source);
                    async move {
                        let result = observe(source.as_ref(), &base.id, now, offset).await;
                        (base, result)
                    }
                })
                .buffered(self.config.in_flight_limit())
                .collect()
                .await;

        let mut crossings = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (base, result) in results {
            match result {
                Ok(observation) => crossings.push(Crossing::observed(base, observation)),
                Err(e) => {
                    debug!(crossing = %base.id, error = %e, "State lookup failed, marking unknown");
                    crossings.push(Crossing::unknown(base));
                    failures.push(e);
                }
            }
        }

        info!(
            crossings = crossings.len(),
            unknown = failures.len(),
            "Enrichment finished"
        );

        Ok(EnrichmentReport {
            crossings,
            failures,
        })
    }
}

/// Look up and interpret one crossing's state.
async fn observe<S: CrossingSource>(
    source: &S,
    id: &CrossingId,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Observation, EnrichmentItemError> {
    let state = source
        .fetch_state(id)
        .await
        .map_err(|source| EnrichmentItemError::Lookup {
            id: id.clone(),
            source,
        })?;

    let changed_at =
        timestamp_from_epoch(state.date).map_err(|source| EnrichmentItemError::Timestamp {
            id: id.clone(),
            source,
        })?;

    Ok(Observation::new(state.state, changed_at, now, offset))
}

/// Drop entries with unusable coordinates or repeated IDs.
fn validate_listing(listing: Vec<LocationDto>) -> Vec<CrossingLocation> {
    let mut seen = HashSet::new();

    listing
        .into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone();
            // Only a usable record claims its ID.
            let location = match dto.into_location() {
                Ok(location) => location,
                Err(e) => {
                    warn!(crossing = %id, error = %e, "Skipping crossing with invalid coordinates");
                    return None;
                }
            };
            if !seen.insert(id) {
                warn!(crossing = %location.id, "Duplicate crossing in listing, keeping first");
                return None;
            }
            Some(location)
        })
        .collect()
}
