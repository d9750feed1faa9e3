//! Caching layer for place search.
//!
//! Search-as-you-type issues the same handful of queries over and over.
//! Results are cached per normalized query (trimmed, lowercased, inner
//! whitespace collapsed) for a short TTL. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::places::{GeocodeError, Geocoder, PlaceCandidate};

/// Cached search results.
type SearchEntry = Arc<Vec<PlaceCandidate>>;

/// Configuration for the search cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached queries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 500,
        }
    }
}

/// Normalize a query into its cache key.
fn cache_key(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Geocoder with caching.
///
/// Wraps any `Geocoder` and caches successful search responses.
pub struct CachedGeocoder<G> {
    inner: G,
    results: MokaCache<String, SearchEntry>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, results }
    }

    /// Access the underlying geocoder for lookups that bypass the cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let key = cache_key(query);
        if key.is_empty() {
            return Ok(Vec::new());
        }

        // Try cache first
        if let Some(cached) = self.results.get(&key).await {
            debug!(query = %key, "Place search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let places = self.inner.search(&key).await?;

        self.results
            .insert(key, Arc::new(places.clone()))
            .await;

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LatLng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder that counts calls and can be told to fail.
    struct CountingGeocoder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGeocoder {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for CountingGeocoder {
        async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeocodeError::Provider("quota exceeded".into()));
            }
            Ok(vec![PlaceCandidate {
                place_id: query.to_string(),
                description: query.to_string(),
                location: LatLng::new(35.0, -85.0).unwrap(),
            }])
        }
    }

    #[test]
    fn key_normalization() {
        assert_eq!(cache_key("  Market   STREET "), "market street");
        assert_eq!(cache_key("   "), "");
    }

    #[test]
    fn default_config() {
        let config = GeocodeCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 500);
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let cached = CachedGeocoder::new(CountingGeocoder::new(false), &GeocodeCacheConfig::default());

        let first = cached.search("Market Street").await.unwrap();
        let second = cached.search("  market   street").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedGeocoder::new(CountingGeocoder::new(true), &GeocodeCacheConfig::default());

        assert!(cached.search("anywhere").await.is_err());
        assert!(cached.search("anywhere").await.is_err());
        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn blank_query_skips_provider() {
        let cached = CachedGeocoder::new(CountingGeocoder::new(false), &GeocodeCacheConfig::default());

        assert!(cached.search("  ").await.unwrap().is_empty());
        assert_eq!(cached.inner().calls(), 0);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedGeocoder::new(CountingGeocoder::new(false), &GeocodeCacheConfig::default());

        cached.search("park").await.unwrap();
        cached.invalidate_all();
        cached.search("park").await.unwrap();

        assert_eq!(cached.inner().calls(), 2);
    }
}
