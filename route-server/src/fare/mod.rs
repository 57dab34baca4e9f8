//! Fare and travel-time rules.
//!
//! There is exactly one fare rule set and one time model; every leg the
//! planner builds is priced and timed through this module.

mod time;

pub use time::TimeModel;

use crate::domain::{PassengerCategory, TransitMode};

/// Flag-fall of every bus or tram ride.
pub const TRANSIT_BASE_FARE: f64 = 7.0;

/// Bus and tram price per kilometre.
pub const TRANSIT_RATE_PER_KM: f64 = 2.0;

/// No bus or tram ride boarded without a transfer costs less than this.
pub const MIN_TRANSIT_FARE: f64 = 7.0;

/// Lower bound of a transfer-adjusted fare.
pub const TRANSFER_FARE_FLOOR: f64 = -5.0;

/// Error returned when a taxi tariff has negative or non-finite values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid taxi tariff: {reason}")]
pub struct InvalidTariff {
    reason: &'static str,
}

/// The city's taxi pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxiTariff {
    opening_fee: f64,
    cost_per_km: f64,
}

impl TaxiTariff {
    /// Create a tariff, validating both values are finite and non-negative.
    pub fn new(opening_fee: f64, cost_per_km: f64) -> Result<Self, InvalidTariff> {
        if !opening_fee.is_finite() || opening_fee < 0.0 {
            return Err(InvalidTariff {
                reason: "opening fee must be finite and non-negative",
            });
        }
        if !cost_per_km.is_finite() || cost_per_km < 0.0 {
            return Err(InvalidTariff {
                reason: "cost per km must be finite and non-negative",
            });
        }
        Ok(Self {
            opening_fee,
            cost_per_km,
        })
    }

    pub fn opening_fee(&self) -> f64 {
        self.opening_fee
    }

    pub fn cost_per_km(&self) -> f64 {
        self.cost_per_km
    }
}

/// What a fare is being computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareMode {
    Transit(TransitMode),
    Taxi,
}

/// Prices legs for a given taxi tariff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareModel {
    taxi: TaxiTariff,
}

impl FareModel {
    pub fn new(taxi: TaxiTariff) -> Self {
        Self { taxi }
    }

    pub fn taxi_tariff(&self) -> TaxiTariff {
        self.taxi
    }

    /// Price of a leg of `distance_km`, rounded to 2 decimal places.
    ///
    /// Transit fares are `(base + km * rate) * (1 - discount)`, floored at
    /// [`MIN_TRANSIT_FARE`]. A ride boarded after a transfer instead gets the
    /// transfer adjustment:
    ///
    /// - up to 2 km: 2.0 off
    /// - up to 5 km: 1.0 off
    /// - longer: half price
    /// - another 1.0 off when the whole journey is longer than 10 km
    ///
    /// and is only bounded below by [`TRANSFER_FARE_FLOOR`]. Taxi fares
    /// ignore the passenger category and the transfer flag and never drop
    /// below the opening fee.
    pub fn fare(
        &self,
        distance_km: f64,
        mode: FareMode,
        category: PassengerCategory,
        is_transfer: bool,
        total_journey_km: Option<f64>,
    ) -> f64 {
        let distance_km = distance_km.max(0.0);
        let fare = match mode {
            FareMode::Taxi => (self.taxi.opening_fee + distance_km * self.taxi.cost_per_km)
                .max(self.taxi.opening_fee),
            FareMode::Transit(_) => {
                let raw = (TRANSIT_BASE_FARE + distance_km * TRANSIT_RATE_PER_KM)
                    * (1.0 - category.discount());
                if is_transfer {
                    transfer_adjusted(raw, distance_km, total_journey_km).max(TRANSFER_FARE_FLOOR)
                } else {
                    raw.max(MIN_TRANSIT_FARE)
                }
            }
        };
        round2(fare)
    }

    /// Fare of a ride boarded without a transfer.
    pub fn transit_fare(
        &self,
        distance_km: f64,
        mode: TransitMode,
        category: PassengerCategory,
    ) -> f64 {
        self.fare(distance_km, FareMode::Transit(mode), category, false, None)
    }

    /// Fare of a ride boarded straight after a transfer.
    pub fn transfer_fare(
        &self,
        distance_km: f64,
        mode: TransitMode,
        category: PassengerCategory,
        total_journey_km: f64,
    ) -> f64 {
        self.fare(
            distance_km,
            FareMode::Transit(mode),
            category,
            true,
            Some(total_journey_km),
        )
    }

    pub fn taxi_fare(&self, distance_km: f64) -> f64 {
        self.fare(
            distance_km,
            FareMode::Taxi,
            PassengerCategory::General,
            false,
            None,
        )
    }

    /// What the rider actually pays for a fare.
    ///
    /// A negative transfer-adjusted fare is a capped discount, not money
    /// handed to the rider, so it is paid as zero.
    pub fn payable(fare: f64) -> f64 {
        fare.max(0.0)
    }
}

fn transfer_adjusted(raw: f64, distance_km: f64, total_journey_km: Option<f64>) -> f64 {
    let mut adjusted = if distance_km <= 2.0 {
        raw - 2.0
    } else if distance_km <= 5.0 {
        raw - 1.0
    } else {
        raw * 0.5
    };
    if total_journey_km.is_some_and(|km| km > 10.0) {
        adjusted -= 1.0;
    }
    adjusted
}

/// Round a money amount to whole kuruş.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
