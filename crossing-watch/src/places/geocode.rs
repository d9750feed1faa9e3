//! Free-text place search.

use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::LatLng;

/// A place offered as a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Provider-specific stable identifier
    pub place_id: String,

    /// Human-readable description shown in the suggestion list
    pub description: String,

    /// Geocoded position of the place
    pub location: LatLng,
}

/// Errors from place search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeocodeError {
    /// The provider failed to answer
    #[error("geocoding failed: {0}")]
    Provider(String),

    /// A place list could not be loaded
    #[error("failed to load places from {path}: {message}")]
    Load { path: String, message: String },
}

/// Trait for turning search text into candidate places.
pub trait Geocoder: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, GeocodeError>> + Send;
}

/// Geocoder backed by a fixed list of named places.
///
/// A query matches a place when every word of the query appears in the
/// place's description, ignoring case. Results keep list order.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    places: Vec<PlaceCandidate>,
}

impl GazetteerGeocoder {
    pub fn new(places: Vec<PlaceCandidate>) -> Self {
        Self { places }
    }

    /// Load places from a JSON array of candidates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let err = |message: String| GeocodeError::Load {
            path: path.display().to_string(),
            message,
        };

        let json = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        let places: Vec<PlaceCandidate> =
            serde_json::from_str(&json).map_err(|e| err(e.to_string()))?;

        Ok(Self::new(places))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn matches(&self, query: &str) -> Vec<PlaceCandidate> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Vec::new();
        }

        self.places
            .iter()
            .filter(|p| {
                let description = p.description.to_lowercase();
                words.iter().all(|w| description.contains(w.as_str()))
            })
            .cloned()
            .collect()
    }
}

impl Geocoder for GazetteerGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        Ok(self.matches(query))
    }
}
