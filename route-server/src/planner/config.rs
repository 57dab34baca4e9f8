//! Planner configuration.

use crate::distance::DistanceMetric;

/// Tunable thresholds for route synthesis.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Trips at most this long (km) are answered with a single walk.
    pub walk_only_km: f64,

    /// Trips at most this long (km) use short-trip planning.
    pub short_trip_km: f64,

    /// Short trips only board at stops within this walk (km) of either end.
    pub short_trip_max_stop_walk_km: f64,

    /// Short trips only ride when walking to and from the stops covers at
    /// most this fraction of the direct distance.
    pub short_trip_walk_ratio: f64,

    /// Nearest stops per mode considered at each end of a long trip.
    pub long_trip_nearest: usize,

    /// Longest walk (km) to or from a stop on a long trip.
    pub taxi_threshold_km: f64,

    /// Radius (km) searched for a stop of the other mode when transferring.
    pub transfer_radius_km: f64,

    /// Transfer points kept after scoring.
    pub transfer_candidates: usize,

    /// Hybrid taxi legs only reach stops within this fraction of the direct
    /// distance.
    pub hybrid_stop_ratio: f64,

    /// Stops considered for each hybrid direction.
    pub hybrid_stop_count: usize,

    /// Candidates kept per category after ranking.
    pub results_per_category: usize,

    /// Metric used to find nearby stops. Fares and times always use
    /// haversine.
    pub metric: DistanceMetric,
}

impl PlannerConfig {
    /// Override the taxi threshold.
    pub fn with_taxi_threshold_km(mut self, km: f64) -> Self {
        self.taxi_threshold_km = km;
        self
    }

    pub fn with_results_per_category(mut self, n: usize) -> Self {
        self.results_per_category = n;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            walk_only_km: 1.0,
            short_trip_km: 3.0,
            short_trip_max_stop_walk_km: 0.5,
            short_trip_walk_ratio: 0.5,
            long_trip_nearest: 3,
            taxi_threshold_km: 3.0,
            transfer_radius_km: 1.0,
            transfer_candidates: 3,
            hybrid_stop_ratio: 0.4,
            hybrid_stop_count: 5,
            results_per_category: 3,
            metric: DistanceMetric::Haversine,
        }
    }
}
