//! k-nearest stop search.

use crate::distance::DistanceMetric;
use crate::domain::{Coordinate, Stop};

/// A stop together with its distance from the query point.
#[derive(Debug, Clone, Copy)]
pub struct NearbyStop<'a> {
    pub stop: &'a Stop,
    pub distance_km: f64,
}

/// The `k` stops closest to `coord`, nearest first.
///
/// Returns `min(k, n)` entries. Equal distances are ordered by stop id so the
/// result does not depend on input order.
pub fn nearest_stops<'a, I>(
    coord: Coordinate,
    stops: I,
    k: usize,
    metric: DistanceMetric,
) -> Vec<NearbyStop<'a>>
where
    I: IntoIterator<Item = &'a Stop>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut found: Vec<NearbyStop<'a>> = stops
        .into_iter()
        .map(|stop| NearbyStop {
            stop,
            distance_km: metric.distance_km(coord, stop.coord),
        })
        .collect();

    found.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.stop.id.cmp(&b.stop.id))
    });
    found.truncate(k);
    found
}
