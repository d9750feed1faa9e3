//! Wire types for the crossing feed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{CrossingId, CrossingLocation, InvalidCoordinate, LatLng};

/// One entry of the `/location` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub id: CrossingId,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationDto {
    /// Validate coordinates and convert to a domain record.
    pub fn into_location(self) -> Result<CrossingLocation, InvalidCoordinate> {
        let location = LatLng::new(self.latitude, self.longitude)?;
        Ok(CrossingLocation {
            id: self.id,
            title: self.title,
            location,
        })
    }
}

/// Decode a `/location` listing entry by entry.
///
/// Entries that do not decode (a `null` coordinate, a missing title, an ID
/// that is neither a string nor a whole number) are skipped with a warning,
/// so one bad record never costs the rest of the listing.
pub fn decode_listing(entries: Vec<serde_json::Value>) -> Vec<LocationDto> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(dto) => Some(dto),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed crossing in listing");
                None
            }
        })
        .collect()
}

/// Response of `/state/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDto {
    /// `true` if blocked.
    pub state: bool,

    /// Epoch seconds of the last state change.
    pub date: f64,
}
