//! Geographic position value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on a route or a stop location, as reported by the provider
///
/// Stored in `(longitude, latitude)` order, the order every provider's wire
/// format uses (`gpsX`/`gpsY`, `x`/`y`, `gpslong`/`gpslati`). Values are not
/// range-checked: the legacy Busan service and stops without coordinates
/// (reported as the origin) must still round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    longitude: f64,
    latitude: f64,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Get the longitude (x)
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the latitude (y)
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns true for the `(0, 0)` placeholder used when a provider omits coordinates
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.longitude == 0.0 && self.latitude == 0.0
    }
}

impl From<(f64, f64)> for Position {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.longitude, self.latitude)
    }
}
