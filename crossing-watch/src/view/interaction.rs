//! Viewer interactions that move the reference point.

use crate::domain::{CrossingId, LatLng, ZoomLevel};
use crate::places::{GeoUnavailableError, PlaceCandidate};

/// Something the viewer did that may change the reference point.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// The map finished a drag or zoom; `center` is its reported center.
    MapMoved { center: LatLng },

    /// A search suggestion was selected.
    SearchSelected { location: LatLng },

    /// The viewer's position was requested (button press or initial load).
    Geolocated(Result<LatLng, GeoUnavailableError>),

    /// A crossing in the list was clicked.
    CrossingSelected(CrossingId),
}

impl Interaction {
    /// Selection of a search result.
    pub fn search_selected(place: &PlaceCandidate) -> Self {
        Interaction::SearchSelected {
            location: place.location,
        }
    }
}

/// Display instruction for the map: recenter and zoom.
///
/// Directives only flow outwards. The map's own "moved" report for a
/// directive we issued is recognised and dropped, so it never loops back in
/// as a viewer interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDirective {
    pub center: LatLng,
    pub zoom: ZoomLevel,
}
