//! Distances between coordinates.
//!
//! Great-circle (haversine) distance is the reference metric and is used for
//! every fare and travel-time calculation. The planar metrics are cheaper
//! approximations, only suitable for ranking nearby stops.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude in kilometres.
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
///
/// ```
/// use route_server::distance::haversine_km;
/// use route_server::domain::Coordinate;
///
/// let a = Coordinate::new(40.7638, 29.9406).unwrap();
/// let b = Coordinate::new(40.7760, 29.9495).unwrap();
///
/// let d = haversine_km(a, b);
/// assert!((d - 1.55).abs() < 0.1);
/// assert_eq!(haversine_km(a, a), 0.0);
/// ```
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h marginally above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// A way of measuring the distance between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Great-circle distance.
    #[default]
    Haversine,
    /// Straight line in degree space, scaled to kilometres.
    Euclidean,
    /// Sum of the degree differences, scaled to kilometres.
    Manhattan,
}

impl DistanceMetric {
    /// Parse a metric name; unknown names fall back to haversine.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => DistanceMetric::Euclidean,
            "manhattan" => DistanceMetric::Manhattan,
            _ => DistanceMetric::Haversine,
        }
    }

    /// Distance between `a` and `b` in kilometres.
    pub fn distance_km(&self, a: Coordinate, b: Coordinate) -> f64 {
        let dlat = b.lat() - a.lat();
        let dlon = b.lon() - a.lon();
        match self {
            DistanceMetric::Haversine => haversine_km(a, b),
            DistanceMetric::Euclidean => (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE,
            DistanceMetric::Manhattan => (dlat.abs() + dlon.abs()) * KM_PER_DEGREE,
        }
    }
}
