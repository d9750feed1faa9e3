//! Crossing identifier type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when constructing an invalid crossing ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid crossing ID: {reason}")]
pub struct InvalidCrossingId {
    reason: &'static str,
}

/// Opaque, stable identifier for a monitored crossing.
///
/// The feed sends IDs as either JSON numbers or strings; both are accepted
/// and kept as text, since the only thing we ever do with an ID is compare
/// it and put it back into a URL.
///
/// # Examples
///
/// ```
/// use crossing_watch::domain::CrossingId;
///
/// let id = CrossingId::new("17").unwrap();
/// assert_eq!(id.as_str(), "17");
///
/// // Empty and whitespace-only IDs are rejected
/// assert!(CrossingId::new("").is_err());
/// assert!(CrossingId::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CrossingId(String);

impl CrossingId {
    /// Create a crossing ID from a string.
    ///
    /// Surrounding whitespace is trimmed. Returns an error if nothing is left.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidCrossingId> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidCrossingId {
                reason: "crossing ID cannot be empty",
            });
        }
        Ok(CrossingId(trimmed.to_string()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CrossingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CrossingId({})", self.0)
    }
}

impl fmt::Display for CrossingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire form of an ID: number or string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for CrossingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match RawId::deserialize(deserializer)? {
            RawId::Int(n) => n.to_string(),
            RawId::UInt(n) => n.to_string(),
            // `2.0` names the same crossing as `2`.
            RawId::Float(n) if n.is_finite() && n.fract() == 0.0 => format!("{n:.0}"),
            RawId::Float(n) => {
                return Err(serde::de::Error::custom(format!(
                    "invalid crossing ID: {n} is not a whole number"
                )));
            }
            RawId::Text(s) => s,
        };
        CrossingId::new(raw).map_err(serde::de::Error::custom)
    }
}
