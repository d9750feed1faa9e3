//! Command-line viewer configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::LatLng;
use crate::enrich::EnrichConfig;
use crate::feed::{DEFAULT_BASE_URL, FeedConfig};
use crate::view::ViewConfig;

/// Lookup waves the default load timeout allows for.
const DEFAULT_LOOKUP_WAVES: usize = 8;

/// Errors in environment configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be \"lat,lng\", got {value:?}: {reason}")]
    InvalidLocation {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the viewer binary needs to run one session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// Serve the feed from this directory instead of the network.
    pub mock_dir: Option<PathBuf>,
    pub enrich: EnrichConfig,
    pub view: ViewConfig,
    /// Position the geolocator reports. `None` means unavailable.
    pub location: Option<LatLng>,
    /// Gazetteer used for search.
    pub places_file: Option<PathBuf>,
    /// Search text whose first match is selected after loading.
    pub search: Option<String>,
    /// How long the viewer waits for the initial load.
    ///
    /// Lookups run `max_in_flight` at a time, so a pass where every lookup
    /// hangs until the HTTP timeout takes about
    /// `ceil(crossings / max_in_flight) * timeout` in total. The default
    /// covers that for 64 crossings at the default settings; raise
    /// `CROSSING_LOAD_TIMEOUT_SECS` for larger feeds.
    pub load_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("CROSSING_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let max_in_flight = parse_positive("CROSSING_MAX_IN_FLIGHT", get("CROSSING_MAX_IN_FLIGHT"), 8)?;
        let timeout_secs = parse_positive("CROSSING_TIMEOUT_SECS", get("CROSSING_TIMEOUT_SECS"), 30)?;
        // Listing request plus eight full waves of lookups.
        let load_timeout_secs = parse_positive(
            "CROSSING_LOAD_TIMEOUT_SECS",
            get("CROSSING_LOAD_TIMEOUT_SECS"),
            timeout_secs * (1 + DEFAULT_LOOKUP_WAVES),
        )?;

        let location = get("CROSSING_LOCATION")
            .map(|v| parse_lat_lng("CROSSING_LOCATION", &v))
            .transpose()?;

        Ok(Self {
            feed: FeedConfig::new(base_url)
                .with_max_concurrent(max_in_flight)
                .with_timeout(timeout_secs as u64),
            mock_dir: get("CROSSING_MOCK_DIR").map(PathBuf::from),
            enrich: EnrichConfig::default().with_max_in_flight(max_in_flight),
            view: ViewConfig::default(),
            location,
            places_file: get("CROSSING_PLACES_FILE").map(PathBuf::from),
            search: get("CROSSING_SEARCH"),
            load_timeout: Duration::from_secs(load_timeout_secs as u64),
        })
    }
}

fn parse_positive(
    var: &'static str,
    value: Option<String>,
    default: usize,
) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

fn parse_lat_lng(var: &'static str, value: &str) -> Result<LatLng, ConfigError> {
    let err = |reason: String| ConfigError::InvalidLocation {
        var,
        value: value.to_string(),
        reason,
    };

    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| err("missing comma".to_string()))?;
    let lat: f64 = lat.trim().parse().map_err(|e| err(format!("latitude: {e}")))?;
    let lng: f64 = lng.trim().parse().map_err(|e| err(format!("longitude: {e}")))?;

    LatLng::new(lat, lng).map_err(|e| err(e.to_string()))
}
