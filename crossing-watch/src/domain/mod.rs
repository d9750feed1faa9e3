//! Domain types for crossing status.
//!
//! All types enforce their invariants at construction time: coordinates are
//! in range, IDs are non-empty, and a crossing's state is either a complete
//! observation or explicitly unknown.

mod crossing;
mod crossing_id;
mod geo;
mod time;

pub use crossing::{Crossing, CrossingLocation, CrossingState, Indicator, Observation};
pub use crossing_id::{CrossingId, InvalidCrossingId};
pub use geo::{InvalidCoordinate, LatLng, ReferencePoint, ZoomLevel};
pub use time::{TimeError, format_elapsed, format_start, timestamp_from_epoch};
