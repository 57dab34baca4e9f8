//! Route types.
//!
//! A `RouteCandidate` is one fully priced proposal for getting from the
//! request's start to its end: an ordered list of `RouteLeg`s (walks, rides,
//! transfers and taxi trips) plus the totals derived from them.

use std::fmt;

use super::{Coordinate, DomainError, StopId, TransitMode};
use crate::fare::round2;

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegMode {
    Walk,
    Bus,
    Tram,
    Taxi,
    /// Changing between a bus and a tram stop.
    Transfer,
}

impl LegMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegMode::Walk => "walk",
            LegMode::Bus => "bus",
            LegMode::Tram => "tram",
            LegMode::Taxi => "taxi",
            LegMode::Transfer => "transfer",
        }
    }

    /// Whether legs of this mode are paid from the farecard.
    pub fn requires_farecard(&self) -> bool {
        matches!(self, LegMode::Bus | LegMode::Tram | LegMode::Transfer)
    }

    fn verb(&self) -> &'static str {
        match self {
            LegMode::Walk => "walk",
            LegMode::Bus => "bus ride",
            LegMode::Tram => "tram ride",
            LegMode::Taxi => "taxi ride",
            LegMode::Transfer => "transfer walk",
        }
    }
}

impl From<TransitMode> for LegMode {
    fn from(mode: TransitMode) -> Self {
        match mode {
            TransitMode::Bus => LegMode::Bus,
            TransitMode::Tram => LegMode::Tram,
        }
    }
}

impl fmt::Display for LegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic segment of a route.
///
/// # Invariants
///
/// - `distance_km` and `cost` are finite and non-negative
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    mode: LegMode,
    from: Coordinate,
    to: Coordinate,
    distance_km: f64,
    time_min: u32,
    cost: f64,
    description: String,
}

impl RouteLeg {
    /// Construct a leg, generating its human-readable description.
    ///
    /// # Errors
    ///
    /// Returns `Err` if distance or cost is negative or not finite.
    pub fn new(
        mode: LegMode,
        from: Coordinate,
        to: Coordinate,
        distance_km: f64,
        time_min: u32,
        cost: f64,
    ) -> Result<Self, DomainError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(DomainError::InvalidLeg(
                "distance must be finite and non-negative",
            ));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::InvalidLeg(
                "cost must be finite and non-negative",
            ));
        }

        let description = format!("{distance_km:.2} km {} ({time_min} min)", mode.verb());

        Ok(Self {
            mode,
            from,
            to,
            distance_km,
            time_min,
            cost,
            description,
        })
    }

    pub fn mode(&self) -> LegMode {
        self.mode
    }

    pub fn from(&self) -> Coordinate {
        self.from
    }

    pub fn to(&self) -> Coordinate {
        self.to
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn time_min(&self) -> u32 {
        self.time_min
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The closed set of route shapes the planner proposes.
///
/// Declaration order is the tie-break order used when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteCategory {
    BusOnly,
    TramOnly,
    /// Bus and tram with a transfer in between.
    Mixed,
    /// A taxi leg combined with one transit ride.
    TaxiTransit,
    TaxiOnly,
    Walking,
}

impl RouteCategory {
    pub const ALL: [RouteCategory; 6] = [
        RouteCategory::BusOnly,
        RouteCategory::TramOnly,
        RouteCategory::Mixed,
        RouteCategory::TaxiTransit,
        RouteCategory::TaxiOnly,
        RouteCategory::Walking,
    ];

    /// Key used for this category in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCategory::BusOnly => "bus_only",
            RouteCategory::TramOnly => "tram_only",
            RouteCategory::Mixed => "mixed",
            RouteCategory::TaxiTransit => "taxi_mixed",
            RouteCategory::TaxiOnly => "taxi_only",
            RouteCategory::Walking => "walking",
        }
    }

    /// The single-mode category served by `mode`.
    pub fn single_mode(mode: TransitMode) -> Self {
        match mode {
            TransitMode::Bus => RouteCategory::BusOnly,
            TransitMode::Tram => RouteCategory::TramOnly,
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete, priced route proposal.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (end of one = start of next)
/// - Totals are the sums over the legs, with the cost rounded to 2 decimals
///
/// Candidates are never modified after construction; build a new one
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    category: RouteCategory,
    legs: Vec<RouteLeg>,
    stops: Vec<StopId>,
    origin: Coordinate,
    destination: Coordinate,
    total_distance_km: f64,
    total_time_min: u32,
    total_cost: f64,
}

impl RouteCandidate {
    /// Construct a candidate, computing its totals from the legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty or consecutive legs don't connect.
    pub fn new(
        category: RouteCategory,
        legs: Vec<RouteLeg>,
        stops: Vec<StopId>,
    ) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(DomainError::EmptyRoute);
        };
        let (origin, destination) = (first.from(), last.to());

        for (i, window) in legs.windows(2).enumerate() {
            if window[0].to() != window[1].from() {
                return Err(DomainError::DisconnectedLegs(i + 1));
            }
        }

        let total_distance_km = legs.iter().map(RouteLeg::distance_km).sum();
        let total_time_min = legs.iter().map(RouteLeg::time_min).sum();
        let total_cost = round2(legs.iter().map(RouteLeg::cost).sum());

        Ok(Self {
            category,
            legs,
            stops,
            origin,
            destination,
            total_distance_km,
            total_time_min,
            total_cost,
        })
    }

    pub fn category(&self) -> RouteCategory {
        self.category
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    /// Stops touched by the route, in travel order.
    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn total_time_min(&self) -> u32 {
        self.total_time_min
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Where the route starts.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Where the route ends.
    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Cost of the legs paid from the farecard.
    pub fn farecard_cost(&self) -> f64 {
        self.legs
            .iter()
            .filter(|leg| leg.mode().requires_farecard())
            .map(RouteLeg::cost)
            .sum()
    }

    /// Cost of the taxi legs, paid from cash or credit card.
    pub fn taxi_cost(&self) -> f64 {
        self.legs
            .iter()
            .filter(|leg| leg.mode() == LegMode::Taxi)
            .map(RouteLeg::cost)
            .sum()
    }

    /// Leg endpoint coordinates in travel order, for drawing the route.
    pub fn polyline(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.legs.len() + 1);
        points.push(self.origin());
        points.extend(self.legs.iter().map(RouteLeg::to));
        points
    }

    /// Returns true if the route is a single walk.
    pub fn is_walk_only(&self) -> bool {
        self.legs.iter().all(|leg| leg.mode() == LegMode::Walk)
    }
}
