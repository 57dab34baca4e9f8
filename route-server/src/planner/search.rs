//! The planning entry point.
//!
//! A [`Planner`] is built per request from a snapshot. It classifies the
//! trip, asks the synthesizer for every category, drops what the rider can't
//! pay for, and ranks what is left.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Coordinate, PassengerCategory, PaymentWallet, RouteCandidate, RouteCategory};
use crate::network::{NetworkGraph, NetworkSnapshot, PathError};

use super::config::PlannerConfig;
use super::payment::retain_affordable;
use super::rank::{rank_category, select_best};
use super::synth::{RouteSynthesizer, Trip, TripKind};

/// Error from route planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The request failed validation
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    /// The routing graph is corrupt
    #[error("route search failed: {0}")]
    Path(#[from] PathError),
}

/// Request for route planning.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    pub passenger: PassengerCategory,
    pub wallet: PaymentWallet,
    /// Overrides [`PlannerConfig::taxi_threshold_km`].
    pub taxi_threshold_km: Option<f64>,
}

impl PlanRequest {
    /// A general-fare request with an unlimited wallet.
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            passenger: PassengerCategory::default(),
            wallet: PaymentWallet::unlimited(),
            taxi_threshold_km: None,
        }
    }

    pub fn with_passenger(mut self, passenger: PassengerCategory) -> Self {
        self.passenger = passenger;
        self
    }

    pub fn with_wallet(mut self, wallet: PaymentWallet) -> Self {
        self.wallet = wallet;
        self
    }

    pub fn with_taxi_threshold_km(mut self, km: f64) -> Self {
        self.taxi_threshold_km = Some(km);
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), PlanError> {
        match self.taxi_threshold_km {
            Some(km) if !km.is_finite() || km < 0.0 => Err(PlanError::InvalidRequest(format!(
                "taxi threshold must be a non-negative number of km, got {km}"
            ))),
            _ => Ok(()),
        }
    }
}

/// The overall answer to a request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The best route across all categories.
    Found(RouteCandidate),
    /// No category produced a route the rider can afford.
    NoFeasibleRoute,
}

/// Result of route planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    /// Great-circle distance between start and end.
    pub direct_km: f64,

    pub kind: TripKind,

    /// Ranked candidates for every category, best first. Categories with no
    /// candidates map to an empty list.
    pub routes: BTreeMap<RouteCategory, Vec<RouteCandidate>>,

    pub outcome: PlanOutcome,
}

impl PlanResult {
    pub fn best(&self) -> Option<&RouteCandidate> {
        match &self.outcome {
            PlanOutcome::Found(route) => Some(route),
            PlanOutcome::NoFeasibleRoute => None,
        }
    }

    /// Candidates for one category.
    pub fn category(&self, category: RouteCategory) -> &[RouteCandidate] {
        self.routes.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every candidate across all categories.
    pub fn candidates(&self) -> impl Iterator<Item = &RouteCandidate> {
        self.routes.values().flatten()
    }
}

/// Multi-modal route planner over one snapshot.
pub struct Planner<'a> {
    snapshot: &'a NetworkSnapshot,
    config: &'a PlannerConfig,
    graph: NetworkGraph,
}

impl<'a> Planner<'a> {
    /// Create a planner, building the routing graph for `snapshot`.
    pub fn new(snapshot: &'a NetworkSnapshot, config: &'a PlannerConfig) -> Self {
        Self {
            snapshot,
            config,
            graph: NetworkGraph::build(snapshot),
        }
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    /// Plan routes for a request.
    ///
    /// "No affordable route" is reported through [`PlanOutcome`], not as an
    /// error.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        request.validate()?;

        let trip = Trip::new(
            request.start,
            request.end,
            request.passenger,
            request.wallet,
            request
                .taxi_threshold_km
                .unwrap_or(self.config.taxi_threshold_km),
            self.config,
        );
        debug!(
            direct_km = trip.direct_km,
            kind = ?trip.kind,
            passenger = trip.passenger.as_str(),
            "planning trip"
        );

        let synth = RouteSynthesizer::new(self.snapshot, &self.graph, self.config);

        let mut routes = BTreeMap::new();
        for category in RouteCategory::ALL {
            let mut candidates = synth.synthesize(category, &trip)?;
            let synthesized = candidates.len();

            retain_affordable(&trip.wallet, &mut candidates);
            let ranked = rank_category(candidates, self.config.results_per_category);

            debug!(
                category = category.as_str(),
                synthesized,
                kept = ranked.len(),
                "category done"
            );
            routes.insert(category, ranked);
        }

        let outcome = match select_best(routes.values().flatten()) {
            Some(best) => PlanOutcome::Found(best.clone()),
            None => PlanOutcome::NoFeasibleRoute,
        };

        Ok(PlanResult {
            direct_km: trip.direct_km,
            kind: trip.kind,
            routes,
            outcome,
        })
    }
}
