//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Coordinate, PassengerCategory, PaymentWallet, RouteCandidate, RouteLeg, Stop,
};
use crate::planner::{PlanOutcome, PlanRequest, PlanResult, TripKind};

/// A point as sent by the web client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateDto {
    pub lat: f64,
    pub lng: f64,
}

impl CoordinateDto {
    fn to_coordinate(self, which: &str) -> Result<Coordinate, String> {
        Coordinate::new(self.lat, self.lng).map_err(|e| format!("invalid {which} coordinate: {e}"))
    }
}

impl From<Coordinate> for CoordinateDto {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat(),
            lng: c.lon(),
        }
    }
}

/// Balances on each payment instrument. Missing instruments hold zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfoDto {
    pub cash: Option<f64>,
    pub credit_card: Option<f64>,
    pub kentkart: Option<f64>,
}

/// Request to plan routes between two points.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRoutesRequest {
    pub start: CoordinateDto,
    pub end: CoordinateDto,

    /// Passenger category name (e.g. "Genel", "Ogrenci", "65+")
    pub passenger_type: Option<String>,

    /// Omitted means the rider can pay for anything
    pub payment_info: Option<PaymentInfoDto>,

    /// Longest walk to a stop on long trips, in km
    pub taxi_threshold: Option<f64>,
}

impl PlanRoutesRequest {
    /// Validate the request and convert it for the planner.
    ///
    /// Returns a user-facing message on failure.
    pub fn to_plan_request(&self) -> Result<PlanRequest, String> {
        let start = self.start.to_coordinate("start")?;
        let end = self.end.to_coordinate("end")?;

        let passenger = match &self.passenger_type {
            Some(name) => PassengerCategory::parse(name).map_err(|e| e.to_string())?,
            None => PassengerCategory::default(),
        };

        let wallet = match &self.payment_info {
            Some(info) => PaymentWallet::from_partial(info.cash, info.credit_card, info.kentkart)
                .map_err(|e| e.to_string())?,
            None => PaymentWallet::unlimited(),
        };

        let mut request = PlanRequest::new(start, end)
            .with_passenger(passenger)
            .with_wallet(wallet);
        if let Some(km) = self.taxi_threshold {
            request = request.with_taxi_threshold_km(km);
        }
        Ok(request)
    }
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct StepResult {
    pub mode: &'static str,
    pub from: CoordinateDto,
    pub to: CoordinateDto,
    /// Kilometres
    pub distance: f64,
    /// Minutes
    pub time: u32,
    pub cost: f64,
    /// Human-readable summary (e.g. "1.20 km bus ride (4 min)")
    pub info: String,
}

impl StepResult {
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            mode: leg.mode().as_str(),
            from: leg.from().into(),
            to: leg.to().into(),
            distance: leg.distance_km(),
            time: leg.time_min(),
            cost: leg.cost(),
            info: leg.description().to_string(),
        }
    }
}

/// A priced route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    #[serde(rename = "type")]
    pub category: &'static str,
    pub steps: Vec<StepResult>,
    pub total_distance: f64,
    pub total_time: u32,
    pub total_cost: f64,
    /// Stop ids touched, in travel order
    pub stops: Vec<String>,
    /// Leg endpoints for drawing the route
    pub polyline: Vec<CoordinateDto>,
}

impl RouteResult {
    pub fn from_candidate(route: &RouteCandidate) -> Self {
        Self {
            category: route.category().as_str(),
            steps: route.legs().iter().map(StepResult::from_leg).collect(),
            total_distance: route.total_distance_km(),
            total_time: route.total_time_min(),
            total_cost: route.total_cost(),
            stops: route.stops().iter().map(|s| s.as_str().to_string()).collect(),
            polyline: route.polyline().into_iter().map(CoordinateDto::from).collect(),
        }
    }
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct PlanRoutesResponse {
    pub message: String,
    /// Great-circle distance between start and end, in km
    pub direct_distance: f64,
    /// Ranked routes keyed by category
    pub routes: BTreeMap<&'static str, Vec<RouteResult>>,
    pub best: Option<RouteResult>,
}

impl PlanRoutesResponse {
    pub fn from_result(result: &PlanResult) -> Self {
        let routes = result
            .routes
            .iter()
            .map(|(category, candidates)| {
                (
                    category.as_str(),
                    candidates.iter().map(RouteResult::from_candidate).collect(),
                )
            })
            .collect();

        let message = match (&result.outcome, result.kind) {
            (PlanOutcome::NoFeasibleRoute, _) => "no affordable route found".to_string(),
            (PlanOutcome::Found(_), TripKind::WalkOnly) => {
                "destination is within walking distance".to_string()
            }
            (PlanOutcome::Found(_), _) => {
                format!("found {} routes", result.candidates().count())
            }
        };

        Self {
            message,
            direct_distance: result.direct_km,
            routes,
            best: result.best().map(RouteResult::from_candidate),
        }
    }
}

/// A stop in the network listing.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
    pub mode: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub terminal: bool,
}

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id.as_str().to_string(),
            name: stop.name.clone(),
            mode: stop.mode.as_str(),
            lat: stop.coord.lat(),
            lon: stop.coord.lon(),
            terminal: stop.terminal,
        }
    }
}

/// Response for the stop listing.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub city: String,
    pub stops: Vec<StopResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
