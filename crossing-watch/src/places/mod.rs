//! Place search and viewer geolocation.
//!
//! Both are external collaborators: the core only consumes the positions
//! they produce. Search results become `SearchSelected` interactions;
//! geolocation results become `Geolocated` ones.

mod geocode;
mod locate;

pub use geocode::{GazetteerGeocoder, GeocodeError, Geocoder, PlaceCandidate};
pub use locate::{FixedGeolocator, GeoUnavailableError, Geolocator};
