//! Viewer geolocation.

use std::future::Future;

use crate::domain::LatLng;

/// Why the viewer's position could not be determined.
///
/// Always treated as "leave the reference point where it is".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoUnavailableError {
    /// The viewer refused location access
    #[error("location permission denied")]
    Denied,

    /// No position could be obtained
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// The position request took too long
    #[error("location request timed out")]
    Timeout,
}

/// Trait for finding where the viewer is.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<LatLng, GeoUnavailableError>> + Send;
}

/// Geolocator that reports a preconfigured position, or none at all.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<LatLng>,
}

impl FixedGeolocator {
    /// Always report `position`.
    pub fn at(position: LatLng) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Always report that no position is available.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<LatLng, GeoUnavailableError> {
        self.position.ok_or_else(|| {
            GeoUnavailableError::Unavailable("no position configured".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_position() {
        let here = LatLng::new(35.0, -85.0).unwrap();
        assert_eq!(FixedGeolocator::at(here).locate().await, Ok(here));
    }

    #[tokio::test]
    async fn unavailable_is_an_error_not_origin() {
        let result = FixedGeolocator::unavailable().locate().await;
        assert!(matches!(result, Err(GeoUnavailableError::Unavailable(_))));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            GeoUnavailableError::Denied.to_string(),
            "location permission denied"
        );
        assert_eq!(
            GeoUnavailableError::Timeout.to_string(),
            "location request timed out"
        );
    }
}
