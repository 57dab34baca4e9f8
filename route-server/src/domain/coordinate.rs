//! Geographic coordinate type.

use std::fmt;

/// Error returned when constructing a coordinate from invalid degrees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 point given as (latitude, longitude) in degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180];
/// both are finite. This is checked at construction.
///
/// # Examples
///
/// ```
/// use route_server::domain::Coordinate;
///
/// let izmit = Coordinate::new(40.7638, 29.9406).unwrap();
/// assert_eq!(izmit.lat(), 40.7638);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "degrees must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}
