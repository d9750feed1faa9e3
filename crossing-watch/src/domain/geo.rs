//! Coordinates and map zoom levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a coordinate is out of range or not a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A latitude/longitude pair in decimal degrees.
///
/// Both components are finite and in range by construction, so distances
/// computed from a `LatLng` are never NaN.
///
/// # Examples
///
/// ```
/// use crossing_watch::domain::LatLng;
///
/// let chattanooga = LatLng::new(35.0482, -85.0520).unwrap();
/// assert_eq!(chattanooga.lat(), 35.0482);
///
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// assert!(LatLng::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng", into = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

/// The point proximity ordering is computed against.
pub type ReferencePoint = LatLng;

impl LatLng {
    /// Create a coordinate, validating ranges.
    ///
    /// Latitude must be within [-90, 90] and longitude within [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        let err = |reason| InvalidCoordinate { lat, lng, reason };

        if !lat.is_finite() || !lng.is_finite() {
            return Err(err("must be finite"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(err("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(err("longitude must be within [-180, 180]"));
        }

        Ok(Self { lat, lng })
    }

    /// Build a coordinate known to be valid at compile time.
    ///
    /// Out-of-range input fails const evaluation.
    pub(crate) const fn from_const(lat: f64, lng: f64) -> Self {
        assert!(lat >= -90.0 && lat <= 90.0 && lng >= -180.0 && lng <= 180.0);
        Self { lat, lng }
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Debug for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Serialize, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        LatLng::new(raw.lat, raw.lng)
    }
}

impl From<LatLng> for RawLatLng {
    fn from(p: LatLng) -> Self {
        RawLatLng {
            lat: p.lat,
            lng: p.lng,
        }
    }
}

/// Map zoom level, as understood by the map-view collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(pub u8);

impl ZoomLevel {
    /// Zoom used when the session starts.
    pub const DEFAULT: ZoomLevel = ZoomLevel(12);
    /// Zoom after locating the viewer.
    pub const CLOSE: ZoomLevel = ZoomLevel(12);
    /// Zoom after selecting a search result.
    pub const NEIGHBORHOOD: ZoomLevel = ZoomLevel(13);
    /// Zoom after clicking a crossing in the list.
    pub const STREET: ZoomLevel = ZoomLevel(16);
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z{}", self.0)
    }
}
