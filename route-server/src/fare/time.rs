//! Travel-time model.

use crate::domain::{LegMode, TransitMode};

/// Minutes per kilometre for each way of travelling.
///
/// | Mode     | min/km | Speed    |
/// |----------|--------|----------|
/// | Walk     | 12     | ~5 km/h  |
/// | Bus      | 3      | ~20 km/h |
/// | Tram     | 2.4    | ~25 km/h |
/// | Taxi     | 1.5    | ~40 km/h |
///
/// Transfers are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeModel;

impl TimeModel {
    pub const WALK_MIN_PER_KM: f64 = 12.0;
    pub const BUS_MIN_PER_KM: f64 = 3.0;
    pub const TRAM_MIN_PER_KM: f64 = 2.4;
    pub const TAXI_MIN_PER_KM: f64 = 1.5;

    /// Whole minutes needed to cover `distance_km` in `mode`.
    pub fn minutes(mode: LegMode, distance_km: f64) -> u32 {
        let per_km = match mode {
            LegMode::Walk | LegMode::Transfer => Self::WALK_MIN_PER_KM,
            LegMode::Bus => Self::BUS_MIN_PER_KM,
            LegMode::Tram => Self::TRAM_MIN_PER_KM,
            LegMode::Taxi => Self::TAXI_MIN_PER_KM,
        };
        (distance_km.max(0.0) * per_km).round() as u32
    }

    pub fn walk(distance_km: f64) -> u32 {
        Self::minutes(LegMode::Walk, distance_km)
    }

    pub fn ride(mode: TransitMode, distance_km: f64) -> u32 {
        Self::minutes(mode.into(), distance_km)
    }

    pub fn taxi(distance_km: f64) -> u32 {
        Self::minutes(LegMode::Taxi, distance_km)
    }
}
