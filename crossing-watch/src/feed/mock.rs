//! Mock crossing feed for testing without network access.
//!
//! Serves a fixed location listing and state table, either built in memory
//! or loaded from a directory containing `locations.json` and `states.json`.
//! Individual lookups can be made to fail, and every lookup is counted so
//! tests can check how many were in flight at once.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::CrossingId;

use super::CrossingSource;
use super::error::FeedError;
use super::types::{LocationDto, StateDto, decode_listing};

/// Mock feed that serves data from memory.
#[derive(Debug, Default)]
pub struct MockFeed {
    locations: Vec<LocationDto>,
    states: HashMap<CrossingId, StateDto>,
    fail_locations: bool,
    failing: HashSet<CrossingId>,
    delay: Option<Duration>,
    lookups: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFeed {
    /// Create a mock serving the given listing and states.
    pub fn new(locations: Vec<LocationDto>, states: HashMap<CrossingId, StateDto>) -> Self {
        Self {
            locations,
            states,
            ..Self::default()
        }
    }

    /// Load mock data from a directory.
    ///
    /// Expects `locations.json` (array of location entries) and
    /// `states.json` (object mapping crossing ID to state).
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let data_dir = data_dir.as_ref();

        let entries: Vec<serde_json::Value> = read_json(&data_dir.join("locations.json"))?;
        let locations = decode_listing(entries);
        let raw_states: HashMap<String, StateDto> = read_json(&data_dir.join("states.json"))?;

        let mut states = HashMap::with_capacity(raw_states.len());
        for (id, state) in raw_states {
            let id = CrossingId::new(&id).map_err(|e| FeedError::Mock {
                message: format!("bad key in states.json: {e}"),
            })?;
            states.insert(id, state);
        }

        Ok(Self::new(locations, states))
    }

    /// Make the location listing fail.
    pub fn with_failing_locations(mut self) -> Self {
        self.fail_locations = true;
        self
    }

    /// Make the state lookup for `id` fail.
    pub fn with_failing_state(mut self, id: CrossingId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Delay every state lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of state lookups made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Highest number of state lookups that were in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FeedError> {
    let json = std::fs::read_to_string(path).map_err(|e| FeedError::Mock {
        message: format!("failed to read {:?}: {}", path, e),
    })?;

    serde_json::from_str(&json).map_err(|e| FeedError::Mock {
        message: format!("failed to parse {:?}: {}", path, e),
    })
}

/// Decrements the in-flight counter when a lookup finishes.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl CrossingSource for MockFeed {
    async fn fetch_locations(&self) -> Result<Vec<LocationDto>, FeedError> {
        if self.fail_locations {
            return Err(FeedError::Mock {
                message: "location listing unavailable".to_string(),
            });
        }
        Ok(self.locations.clone())
    }

    async fn fetch_state(&self, id: &CrossingId) -> Result<StateDto, FeedError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        if self.failing.contains(id) {
            return Err(FeedError::Mock {
                message: format!("connection reset while fetching {id}"),
            });
        }

        self.states
            .get(id)
            .copied()
            .ok_or_else(|| FeedError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn id(s: &str) -> CrossingId {
        CrossingId::new(s).unwrap()
    }

    fn write_fixture(dir: &Path) {
        std::fs::write(
            dir.join("locations.json"),
            r#"[{"id": 1, "title": "Turner & 13th", "latitude": 35.0, "longitude": -85.0}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("states.json"),
            r#"{"1": {"state": true, "date": 1700000000}}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn load_from_directory() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let feed = MockFeed::load(dir.path()).unwrap();
        let locations = feed.fetch_locations().await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].title, "Turner & 13th");

        let state = feed.fetch_state(&id("1")).await.unwrap();
        assert!(state.state);
        assert_eq!(feed.lookup_count(), 1);
    }

    #[tokio::test]
    async fn load_skips_malformed_listing_entries() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::write(
            dir.path().join("locations.json"),
            r#"[
                {"id": 1, "title": "Turner & 13th", "latitude": 35.0, "longitude": -85.0},
                {"id": 2, "title": "Broken", "latitude": null, "longitude": -85.0}
            ]"#,
        )
        .unwrap();

        let feed = MockFeed::load(dir.path()).unwrap();
        let locations = feed.fetch_locations().await.unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].id, id("1"));
    }

    #[test]
    fn load_missing_directory_fails() {
        let result = MockFeed::load("/nonexistent/mock/feed");
        assert!(matches!(result, Err(FeedError::Mock { .. })));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let feed = MockFeed::new(vec![], HashMap::new());
        let result = feed.fetch_state(&id("99")).await;
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn injected_failures() {
        let feed = MockFeed::new(vec![], HashMap::new())
            .with_failing_locations()
            .with_failing_state(id("3"));

        assert!(feed.fetch_locations().await.is_err());
        assert!(matches!(
            feed.fetch_state(&id("3")).await,
            Err(FeedError::Mock { .. })
        ));
    }

    #[tokio::test]
    async fn in_flight_returns_to_zero() {
        let mut states = HashMap::new();
        states.insert(id("1"), StateDto { state: false, date: 0.0 });
        let feed = MockFeed::new(vec![], states);

        feed.fetch_state(&id("1")).await.unwrap();
        assert_eq!(feed.peak_in_flight(), 1);
        assert_eq!(feed.in_flight.load(Ordering::SeqCst), 0);
    }
}
