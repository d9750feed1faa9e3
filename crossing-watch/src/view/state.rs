//! The view coordinator.
//!
//! `ViewState` is the single owner of the reference point, zoom level and
//! crossing list. Everything that changes them goes through its methods, and
//! every change that affects order re-sorts before returning, so the list it
//! hands out is always ordered for the current point.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Crossing, LatLng, ReferencePoint, ZoomLevel};
use crate::enrich::{EnrichError, EnrichmentReport};
use crate::places::GeoUnavailableError;
use crate::proximity::sort_by_distance;

use super::interaction::{Interaction, MapDirective};

/// Default reference point: downtown Chattanooga.
const DEFAULT_POINT: LatLng = LatLng::from_const(35.0482, -85.0520);

/// Directive centers remembered while waiting for the map to echo them.
const ECHO_LIMIT: usize = 4;

/// Load phase of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Error,
}

impl Phase {
    /// True once a load has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Error)
    }
}

/// Identifies one load pass. Completions carrying an old ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a load completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started; the completion was discarded.
    Stale,
}

/// Initial view parameters.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub initial_point: ReferencePoint,
    pub initial_zoom: ZoomLevel,
}

impl ViewConfig {
    pub fn new(initial_point: ReferencePoint, initial_zoom: ZoomLevel) -> Self {
        Self {
            initial_point,
            initial_zoom,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_point: DEFAULT_POINT,
            initial_zoom: ZoomLevel::DEFAULT,
        }
    }
}

/// Immutable picture of the view at one moment.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub phase: Phase,
    pub point: ReferencePoint,
    pub zoom: ZoomLevel,
    /// Crossings nearest-first. Empty unless `phase` is `Ready`.
    pub crossings: Arc<[Crossing]>,
    /// How many crossings have unknown state.
    pub unknown: usize,
    /// Why the last load failed, when `phase` is `Error`.
    pub error: Option<String>,
    /// Number of loads started so far.
    pub generation: u64,
}

/// Coordinator state for one viewer session.
#[derive(Debug)]
pub struct ViewState {
    phase: Phase,
    point: ReferencePoint,
    zoom: ZoomLevel,
    /// Crossings in the order enrichment produced them.
    enriched: Arc<[Crossing]>,
    /// `enriched` sorted for `point`.
    ordered: Arc<[Crossing]>,
    unknown: usize,
    error: Option<String>,
    generation: u64,
    /// Centers of directives whose echo has not come back yet, oldest first.
    pending_echoes: VecDeque<LatLng>,
    /// Set once anything has moved the reference point.
    point_chosen: bool,
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            phase: Phase::Uninitialized,
            point: config.initial_point,
            zoom: config.initial_zoom,
            enriched: Arc::from([]),
            ordered: Arc::from([]),
            unknown: 0,
            error: None,
            generation: 0,
            pending_echoes: VecDeque::with_capacity(ECHO_LIMIT),
            point_chosen: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reference_point(&self) -> ReferencePoint {
        self.point
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// Crossings nearest-first.
    pub fn crossings(&self) -> &[Crossing] {
        &self.ordered
    }

    /// Start a load pass, superseding any pass still in flight.
    ///
    /// The current list is dropped; it comes back only when the new pass
    /// completes.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.enriched = Arc::from([]);
        self.ordered = Arc::from([]);
        self.unknown = 0;
        self.error = None;

        debug!(generation = self.generation, "Load started");
        LoadTicket(self.generation)
    }

    /// Apply the result of a load pass.
    ///
    /// On success the list is sorted for the reference point as it is *now*,
    /// which includes any moves made while the pass was running.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<EnrichmentReport, EnrichError>,
    ) -> LoadOutcome {
        if ticket.0 != self.generation || self.phase != Phase::Loading {
            debug!(
                ticket = ticket.0,
                generation = self.generation,
                "Discarding superseded load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(report) => {
                if !report.is_complete() {
                    warn!(
                        unknown = report.unknown_count(),
                        "Some crossing states could not be fetched"
                    );
                }
                self.unknown = report.unknown_count();
                self.enriched = report.crossings.into();
                self.resort();
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Crossing load failed");
                self.error = Some(e.to_string());
                self.phase = Phase::Error;
            }
        }

        LoadOutcome::Applied
    }

    /// Replace the reference point, optionally changing zoom.
    ///
    /// Re-sorts immediately when a list is loaded. While loading, the point
    /// is only recorded; the sort happens once the load completes.
    pub fn set_reference_point(&mut self, point: ReferencePoint, zoom: Option<ZoomLevel>) {
        self.point = point;
        self.point_chosen = true;
        if let Some(zoom) = zoom {
            self.zoom = zoom;
        }
        if self.phase == Phase::Ready {
            self.resort();
        }
    }

    /// Apply a viewer interaction.
    ///
    /// Returns a directive when the map should be recentered.
    pub fn apply(&mut self, interaction: Interaction) -> Option<MapDirective> {
        match interaction {
            Interaction::MapMoved { center } => {
                // Echoes arrive in directive order; anything older than the
                // matched one will not be echoed any more.
                if let Some(pos) = self.pending_echoes.iter().position(|c| *c == center) {
                    self.pending_echoes.drain(..=pos);
                    debug!(%center, "Ignoring map echo of our own directive");
                    return None;
                }
                self.set_reference_point(center, None);
                None
            }
            Interaction::SearchSelected { location } => {
                Some(self.recenter(location, ZoomLevel::NEIGHBORHOOD))
            }
            Interaction::Geolocated(Ok(position)) => Some(self.recenter(position, ZoomLevel::CLOSE)),
            Interaction::Geolocated(Err(e)) => {
                debug!(error = %e, "Geolocation unavailable, keeping reference point");
                None
            }
            Interaction::CrossingSelected(id) => {
                let Some(location) = self
                    .enriched
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.location)
                else {
                    debug!(crossing = %id, "Selected crossing is not in the list");
                    return None;
                };
                Some(self.recenter(location, ZoomLevel::STREET))
            }
        }
    }

    /// Apply the position found when the session started.
    ///
    /// The fix can arrive well after the viewer has dragged, searched or
    /// picked a crossing; in that case it is dropped rather than yanking the
    /// point back.
    pub fn apply_initial_position(
        &mut self,
        result: Result<LatLng, GeoUnavailableError>,
    ) -> Option<MapDirective> {
        if self.point_chosen {
            debug!("Reference point already chosen, ignoring initial position");
            return None;
        }
        self.apply(Interaction::Geolocated(result))
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            phase: self.phase,
            point: self.point,
            zoom: self.zoom,
            crossings: Arc::clone(&self.ordered),
            unknown: self.unknown,
            error: self.error.clone(),
            generation: self.generation,
        }
    }

    fn recenter(&mut self, center: LatLng, zoom: ZoomLevel) -> MapDirective {
        self.set_reference_point(center, Some(zoom));
        if self.pending_echoes.len() == ECHO_LIMIT {
            self.pending_echoes.pop_front();
        }
        self.pending_echoes.push_back(center);
        MapDirective { center, zoom }
    }

    fn resort(&mut self) {
        // Always sort from enrichment order so the result does not depend on
        // earlier reference points, even for ties.
        self.ordered = sort_by_distance(&self.enriched[..], self.point).into();
    }
}
