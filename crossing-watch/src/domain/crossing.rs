//! Crossing records and their live state.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use super::crossing_id::CrossingId;
use super::geo::LatLng;
use super::time::{format_elapsed, format_start};

/// A base crossing record, as listed by the location feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingLocation {
    pub id: CrossingId,
    pub title: String,
    pub location: LatLng,
}

/// A point-in-time observation of a crossing's state.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// `true` if the crossing is blocked.
    pub blocked: bool,

    /// When the crossing last changed state.
    pub changed_at: DateTime<Utc>,

    /// `changed_at` formatted for display.
    pub start: String,

    /// Time elapsed since `changed_at`, fixed when the observation was made.
    pub duration: String,
}

impl Observation {
    /// Build an observation, formatting times relative to `now`.
    pub fn new(
        blocked: bool,
        changed_at: DateTime<Utc>,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            blocked,
            changed_at,
            start: format_start(changed_at, offset),
            duration: format_elapsed(changed_at, now),
        }
    }
}

/// Live state of a crossing.
///
/// `Unknown` is a state in its own right: a crossing whose lookup failed is
/// never reported as clear.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CrossingState {
    #[default]
    Unknown,
    Observed(Observation),
}

/// What the viewer should be shown for a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Blocked,
    Clear,
    Unknown,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Indicator::Blocked => "BLOCKED",
            Indicator::Clear => "CLEAR",
            Indicator::Unknown => "UNKNOWN",
        })
    }
}

/// A monitored crossing with location and (possibly unknown) live state.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub id: CrossingId,
    pub title: String,
    pub location: LatLng,
    pub state: CrossingState,
}

impl Crossing {
    /// A crossing with no state information yet.
    pub fn unknown(base: CrossingLocation) -> Self {
        Self {
            id: base.id,
            title: base.title,
            location: base.location,
            state: CrossingState::Unknown,
        }
    }

    /// A crossing with an observed state.
    pub fn observed(base: CrossingLocation, observation: Observation) -> Self {
        Self {
            state: CrossingState::Observed(observation),
            ..Self::unknown(base)
        }
    }

    /// `Some(true)` if blocked, `Some(false)` if clear, `None` if unknown.
    pub fn is_blocked(&self) -> Option<bool> {
        match &self.state {
            CrossingState::Observed(obs) => Some(obs.blocked),
            CrossingState::Unknown => None,
        }
    }

    /// The observation, if the state is known.
    pub fn observation(&self) -> Option<&Observation> {
        match &self.state {
            CrossingState::Observed(obs) => Some(obs),
            CrossingState::Unknown => None,
        }
    }

    pub fn indicator(&self) -> Indicator {
        match self.is_blocked() {
            Some(true) => Indicator::Blocked,
            Some(false) => Indicator::Clear,
            None => Indicator::Unknown,
        }
    }
}
