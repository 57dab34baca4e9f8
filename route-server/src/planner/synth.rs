//! Route synthesis.
//!
//! Turns a trip into concrete, priced candidates for each route category.
//! Which categories are attempted depends on the direct distance:
//!
//! - walk-only trips get a single walk
//! - short trips get a walk, a taxi and, when stops are close to both ends,
//!   single-mode transit
//! - long trips get a taxi, single-mode transit, mixed bus/tram routes with a
//!   transfer, and taxi + transit hybrids
//!
//! Transit is only attempted when the farecard can pay at least the minimum
//! fare.

use tracing::{debug, trace};

use crate::distance::haversine_km;
use crate::domain::{
    Coordinate, DomainError, LegMode, PassengerCategory, PaymentWallet, RouteCandidate,
    RouteCategory, RouteLeg, Stop, StopId, TransitMode,
};
use crate::fare::{FareModel, MIN_TRANSIT_FARE, TimeModel};
use crate::network::{
    EdgeKind, NearbyStop, NetworkGraph, NetworkSnapshot, PathError, ShortestPath, nearest_stops,
    shortest_path,
};

use super::config::PlannerConfig;

/// Planning strategy chosen from the direct distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripKind {
    WalkOnly,
    Short,
    Long,
}

impl TripKind {
    pub fn classify(direct_km: f64, config: &PlannerConfig) -> Self {
        if direct_km <= config.walk_only_km {
            TripKind::WalkOnly
        } else if direct_km <= config.short_trip_km {
            TripKind::Short
        } else {
            TripKind::Long
        }
    }
}

/// Everything synthesis needs to know about one request.
#[derive(Debug, Clone)]
pub struct Trip {
    pub start: Coordinate,
    pub end: Coordinate,
    pub direct_km: f64,
    pub kind: TripKind,
    pub passenger: PassengerCategory,
    pub wallet: PaymentWallet,
    pub taxi_threshold_km: f64,
}

impl Trip {
    pub fn new(
        start: Coordinate,
        end: Coordinate,
        passenger: PassengerCategory,
        wallet: PaymentWallet,
        taxi_threshold_km: f64,
        config: &PlannerConfig,
    ) -> Self {
        let direct_km = haversine_km(start, end);
        Self {
            start,
            end,
            direct_km,
            kind: TripKind::classify(direct_km, config),
            passenger,
            wallet,
            taxi_threshold_km,
        }
    }

    fn transit_allowed(&self) -> bool {
        self.wallet.farecard() >= MIN_TRANSIT_FARE
    }
}

/// Accumulates legs for one candidate.
struct RouteBuilder {
    category: RouteCategory,
    legs: Vec<RouteLeg>,
    stops: Vec<StopId>,
}

impl RouteBuilder {
    fn new(category: RouteCategory) -> Self {
        Self {
            category,
            legs: Vec::new(),
            stops: Vec::new(),
        }
    }

    fn touch(&mut self, stop: &Stop) {
        if self.stops.last() != Some(&stop.id) {
            self.stops.push(stop.id.clone());
        }
    }

    /// Connector walk to or from a stop; nothing is added if the points
    /// coincide.
    fn walk(&mut self, from: Coordinate, to: Coordinate) -> Result<(), DomainError> {
        if from == to {
            return Ok(());
        }
        let km = haversine_km(from, to);
        self.legs
            .push(RouteLeg::new(LegMode::Walk, from, to, km, TimeModel::walk(km), 0.0)?);
        Ok(())
    }

    fn taxi(&mut self, fares: &FareModel, from: Coordinate, to: Coordinate) -> Result<(), DomainError> {
        if from == to {
            return Ok(());
        }
        let km = haversine_km(from, to);
        self.legs.push(RouteLeg::new(
            LegMode::Taxi,
            from,
            to,
            km,
            TimeModel::taxi(km),
            fares.taxi_fare(km),
        )?);
        Ok(())
    }

    fn transfer(&mut self, from: &Stop, to: &Stop, time_min: u32, cost: f64) -> Result<(), DomainError> {
        self.touch(from);
        let km = haversine_km(from.coord, to.coord);
        self.legs.push(RouteLeg::new(
            LegMode::Transfer,
            from.coord,
            to.coord,
            km,
            time_min,
            cost,
        )?);
        self.touch(to);
        Ok(())
    }

    /// One ride through `path`, paid as a single boarding.
    fn ride(&mut self, path: &[&Stop], km: f64, cost: f64) -> Result<(), DomainError> {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Ok(());
        };
        let mode = first.mode;
        self.legs.push(RouteLeg::new(
            mode.into(),
            first.coord,
            last.coord,
            km,
            TimeModel::ride(mode, km),
            cost,
        )?);
        for stop in path {
            self.touch(stop);
        }
        Ok(())
    }

    fn finish(self) -> Result<RouteCandidate, DomainError> {
        RouteCandidate::new(self.category, self.legs, self.stops)
    }
}

/// Length of a ride through consecutive stops.
fn path_km(path: &[&Stop]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_km(pair[0].coord, pair[1].coord))
        .sum()
}

/// Keep a built candidate, skipping duplicates and logging failures.
fn keep(out: &mut Vec<RouteCandidate>, built: Result<Option<RouteCandidate>, DomainError>) {
    match built {
        Ok(Some(candidate)) => {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        Ok(None) => {}
        Err(e) => debug!(error = %e, "discarding malformed candidate"),
    }
}

/// Builds candidates for each category against one snapshot.
pub struct RouteSynthesizer<'a> {
    snapshot: &'a NetworkSnapshot,
    graph: &'a NetworkGraph,
    config: &'a PlannerConfig,
    fares: FareModel,
}

impl<'a> RouteSynthesizer<'a> {
    pub fn new(
        snapshot: &'a NetworkSnapshot,
        graph: &'a NetworkGraph,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            snapshot,
            graph,
            config,
            fares: snapshot.fare_model(),
        }
    }

    /// Candidates for one category. Payment is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the routing graph holds an invalid edge weight.
    pub fn synthesize(
        &self,
        category: RouteCategory,
        trip: &Trip,
    ) -> Result<Vec<RouteCandidate>, PathError> {
        let candidates = match (category, trip.kind) {
            (RouteCategory::Walking, TripKind::WalkOnly | TripKind::Short) => self.walking(trip),
            (RouteCategory::Walking, TripKind::Long) => Vec::new(),
            (_, TripKind::WalkOnly) => Vec::new(),
            (RouteCategory::TaxiOnly, _) => self.taxi_only(trip),
            (RouteCategory::BusOnly, _) => self.single_mode(trip, TransitMode::Bus),
            (RouteCategory::TramOnly, _) => self.single_mode(trip, TransitMode::Tram),
            (RouteCategory::Mixed, TripKind::Long) => self.mixed(trip)?,
            (RouteCategory::TaxiTransit, TripKind::Long) => self.hybrid(trip),
            (RouteCategory::Mixed | RouteCategory::TaxiTransit, TripKind::Short) => Vec::new(),
        };
        Ok(candidates)
    }

    /// The whole trip on foot. Always one leg, even when start and end
    /// coincide.
    fn walking(&self, trip: &Trip) -> Vec<RouteCandidate> {
        let mut out = Vec::new();
        let km = trip.direct_km;
        let built = RouteLeg::new(LegMode::Walk, trip.start, trip.end, km, TimeModel::walk(km), 0.0)
            .and_then(|leg| RouteCandidate::new(RouteCategory::Walking, vec![leg], Vec::new()))
            .map(Some);
        keep(&mut out, built);
        out
    }

    fn taxi_only(&self, trip: &Trip) -> Vec<RouteCandidate> {
        let mut out = Vec::new();
        let mut route = RouteBuilder::new(RouteCategory::TaxiOnly);
        let built = route
            .taxi(&self.fares, trip.start, trip.end)
            .and_then(|()| route.finish().map(Some));
        keep(&mut out, built);
        out
    }

    /// Bus-only or tram-only routes.
    fn single_mode(&self, trip: &Trip, mode: TransitMode) -> Vec<RouteCandidate> {
        let mut out = Vec::new();
        if !trip.transit_allowed() {
            return out;
        }

        let (k, max_walk) = match trip.kind {
            TripKind::Short => (1, self.config.short_trip_max_stop_walk_km),
            TripKind::Long => (self.config.long_trip_nearest, trip.taxi_threshold_km),
            TripKind::WalkOnly => return out,
        };

        let starts = self.nearby(trip.start, mode, k, max_walk);
        let ends = self.nearby(trip.end, mode, k, max_walk);

        for board in &starts {
            for alight in &ends {
                if trip.kind == TripKind::Short
                    && board.distance_km + alight.distance_km
                        > self.config.short_trip_walk_ratio * trip.direct_km
                {
                    trace!(board = %board.stop.id, alight = %alight.stop.id, "walk too long for short trip");
                    continue;
                }
                let Some(path) = self.line_path(board.stop, alight.stop) else {
                    continue;
                };
                keep(&mut out, self.build_single(trip, mode, &path));
            }
        }

        out
    }

    fn build_single(
        &self,
        trip: &Trip,
        mode: TransitMode,
        path: &[&Stop],
    ) -> Result<Option<RouteCandidate>, DomainError> {
        let (Some(board), Some(alight)) = (path.first(), path.last()) else {
            return Ok(None);
        };
        let mut route = RouteBuilder::new(RouteCategory::single_mode(mode));
        route.walk(trip.start, board.coord)?;
        self.push_ride(&mut route, trip, path, false)?;
        route.walk(alight.coord, trip.end)?;
        route.finish().map(Some)
    }

    /// Bus then tram, or tram then bus, with one change.
    fn mixed(&self, trip: &Trip) -> Result<Vec<RouteCandidate>, PathError> {
        let mut out = Vec::new();
        if !trip.transit_allowed() {
            return Ok(out);
        }

        let k = self.config.long_trip_nearest;
        for first in [TransitMode::Bus, TransitMode::Tram] {
            let starts = self.nearby(trip.start, first, k, trip.taxi_threshold_km);
            let ends = self.nearby(trip.end, first.other(), k, trip.taxi_threshold_km);

            for board in &starts {
                for alight in &ends {
                    let (Some(from), Some(to)) = (
                        self.snapshot.position(&board.stop.id),
                        self.snapshot.position(&alight.stop.id),
                    ) else {
                        continue;
                    };

                    let path = shortest_path(self.graph, from, to)?;
                    let built = match self.mixed_from_path(trip, &path) {
                        Ok(None) => self.mixed_by_proximity(trip, board.stop, alight.stop),
                        other => other,
                    };
                    keep(&mut out, built);
                }
            }
        }

        Ok(out)
    }

    /// A mixed route following a solver path that uses at least one
    /// transfer link.
    fn mixed_from_path(
        &self,
        trip: &Trip,
        path: &ShortestPath,
    ) -> Result<Option<RouteCandidate>, DomainError> {
        let uses_transfer = path
            .steps
            .iter()
            .any(|step| matches!(&step.via, Some(edge) if edge.kind == EdgeKind::Transfer));
        let Some(first) = path.steps.first() else {
            return Ok(None);
        };
        if !uses_transfer {
            return Ok(None);
        }

        let stops = self.snapshot.stops();
        let mut current = &stops[first.position];
        let mut route = RouteBuilder::new(RouteCategory::Mixed);
        route.walk(trip.start, current.coord)?;

        let mut ride = vec![current];
        let mut transferred = false;
        for step in &path.steps[1..] {
            let Some(edge) = &step.via else { continue };
            let next = &stops[step.position];
            match edge.kind {
                EdgeKind::Direct => ride.push(next),
                EdgeKind::Transfer => {
                    self.push_ride(&mut route, trip, &ride, transferred)?;
                    let minutes = edge.time_min.max(0.0).round() as u32;
                    route.transfer(current, next, minutes, FareModel::payable(edge.fare))?;
                    transferred = true;
                    ride = vec![next];
                }
            }
            current = next;
        }
        self.push_ride(&mut route, trip, &ride, transferred)?;
        route.walk(current.coord, trip.end)?;

        route.finish().map(Some)
    }

    /// A mixed route for stop pairs the transfer links don't connect: ride
    /// toward the target, then walk to a nearby stop of the other mode.
    fn mixed_by_proximity(
        &self,
        trip: &Trip,
        board: &'a Stop,
        target: &'a Stop,
    ) -> Result<Option<RouteCandidate>, DomainError> {
        let traced = self.trace_toward(board, target.coord, None);

        // Alight at the visited stop nearest the target
        let Some((alight_idx, alight)) = traced
            .iter()
            .enumerate()
            .skip(1)
            .min_by(|(_, a), (_, b)| {
                haversine_km(a.coord, target.coord)
                    .total_cmp(&haversine_km(b.coord, target.coord))
                    .then_with(|| a.id.cmp(&b.id))
            })
        else {
            return Ok(None);
        };
        let first_ride = &traced[..=alight_idx];

        for change in self.transfer_points(alight, trip.end) {
            let second_ride = if change.id == target.id {
                vec![change]
            } else {
                match self.line_path(change, target) {
                    Some(path) => path,
                    None => continue,
                }
            };

            let mut route = RouteBuilder::new(RouteCategory::Mixed);
            route.walk(trip.start, board.coord)?;
            self.push_ride(&mut route, trip, first_ride, false)?;
            let transfer_km = haversine_km(alight.coord, change.coord);
            route.transfer(
                alight,
                change,
                TimeModel::minutes(LegMode::Transfer, transfer_km),
                0.0,
            )?;
            self.push_ride(&mut route, trip, &second_ride, true)?;
            route.walk(target.coord, trip.end)?;
            return route.finish().map(Some);
        }

        Ok(None)
    }

    /// Stops of the other mode within the transfer radius of `current`,
    /// best first by how much closer they are to `destination`.
    fn transfer_points(&self, current: &Stop, destination: Coordinate) -> Vec<&'a Stop> {
        let current_to_dest = haversine_km(current.coord, destination);

        let mut scored: Vec<(f64, f64, &'a Stop)> = self
            .snapshot
            .stops_of_mode(current.mode.other())
            .filter_map(|stop| {
                let transfer_km = haversine_km(current.coord, stop.coord);
                if transfer_km > self.config.transfer_radius_km {
                    return None;
                }
                let to_dest = haversine_km(stop.coord, destination);
                let direction = if current_to_dest > 0.0 {
                    to_dest / current_to_dest
                } else {
                    to_dest
                };
                Some((direction, transfer_km, stop))
            })
            .collect();

        scored.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.total_cmp(&b.1))
                .then_with(|| a.2.id.cmp(&b.2.id))
        });
        scored.truncate(self.config.transfer_candidates);
        scored.into_iter().map(|(_, _, stop)| stop).collect()
    }

    /// Taxi to a stop then ride toward the end, or ride then taxi to the end.
    fn hybrid(&self, trip: &Trip) -> Vec<RouteCandidate> {
        let mut out = Vec::new();
        if !trip.transit_allowed() {
            return out;
        }

        let reach = self.config.hybrid_stop_ratio * trip.direct_km;
        let count = self.config.hybrid_stop_count;

        for hub in self.nearby_any(trip.start, count, reach) {
            let Some(exit) = self
                .nearby(trip.end, hub.stop.mode, 1, trip.taxi_threshold_km)
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(path) = self.line_path(hub.stop, exit.stop) else {
                continue;
            };

            let mut route = RouteBuilder::new(RouteCategory::TaxiTransit);
            let built = route
                .taxi(&self.fares, trip.start, hub.stop.coord)
                .and_then(|()| self.push_ride(&mut route, trip, &path, false))
                .and_then(|()| route.walk(exit.stop.coord, trip.end))
                .and_then(|()| route.finish().map(Some));
            keep(&mut out, built);
        }

        for hub in self.nearby_any(trip.end, count, reach) {
            let Some(entry) = self
                .nearby(trip.start, hub.stop.mode, 1, trip.taxi_threshold_km)
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(path) = self.line_path(entry.stop, hub.stop) else {
                continue;
            };

            let mut route = RouteBuilder::new(RouteCategory::TaxiTransit);
            let built = route
                .walk(trip.start, entry.stop.coord)
                .and_then(|()| self.push_ride(&mut route, trip, &path, false))
                .and_then(|()| route.taxi(&self.fares, hub.stop.coord, trip.end))
                .and_then(|()| route.finish().map(Some));
            keep(&mut out, built);
        }

        out
    }

    /// Price a ride and add it to the route. Paths of fewer than two stops
    /// add nothing.
    ///
    /// The rider pays once per boarding: the whole path is one leg with one
    /// fare, not one fare per stop-to-stop hop.
    fn push_ride(
        &self,
        route: &mut RouteBuilder,
        trip: &Trip,
        path: &[&Stop],
        after_transfer: bool,
    ) -> Result<(), DomainError> {
        let Some(first) = path.first() else {
            return Ok(());
        };
        if path.len() < 2 {
            return Ok(());
        }

        let km = path_km(path);
        let fare = if after_transfer {
            self.fares
                .transfer_fare(km, first.mode, trip.passenger, trip.direct_km)
        } else {
            self.fares.transit_fare(km, first.mode, trip.passenger)
        };
        route.ride(path, km, FareModel::payable(fare))
    }

    /// Up to `k` stops of `mode` within `max_km` of `coord`.
    fn nearby(
        &self,
        coord: Coordinate,
        mode: TransitMode,
        k: usize,
        max_km: f64,
    ) -> Vec<NearbyStop<'a>> {
        let mut found = nearest_stops(coord, self.snapshot.stops_of_mode(mode), k, self.config.metric);
        found.retain(|n| n.distance_km <= max_km);
        found
    }

    /// Up to `k` stops of either mode within `max_km` of `coord`.
    fn nearby_any(&self, coord: Coordinate, k: usize, max_km: f64) -> Vec<NearbyStop<'a>> {
        let mut found = nearest_stops(coord, self.snapshot.stops(), k, self.config.metric);
        found.retain(|n| n.distance_km <= max_km);
        found
    }

    /// Ride along one line from `from` to `to`, if the greedy walk reaches it.
    fn line_path(&self, from: &'a Stop, to: &'a Stop) -> Option<Vec<&'a Stop>> {
        if from.id == to.id {
            return None;
        }
        let path = self.trace_toward(from, to.coord, Some(to));
        match path.last() {
            Some(last) if last.id == to.id => Some(path),
            _ => None,
        }
    }

    /// Follow same-mode next-stop links from `from`, always taking the
    /// unvisited stop nearest `target`, until `stop_at` is reached or no
    /// link is left. The returned path starts with `from`.
    fn trace_toward(
        &self,
        from: &'a Stop,
        target: Coordinate,
        stop_at: Option<&Stop>,
    ) -> Vec<&'a Stop> {
        let mut visited = vec![false; self.snapshot.len()];
        if let Some(i) = self.snapshot.position(&from.id) {
            visited[i] = true;
        }

        let mut path = vec![from];
        let mut current = from;
        while stop_at.is_none_or(|s| s.id != current.id) {
            let next = current
                .next_stops
                .iter()
                .filter_map(|edge| self.snapshot.position(&edge.target))
                .filter(|&i| !visited[i] && self.snapshot.stops()[i].mode == from.mode)
                .min_by(|&a, &b| {
                    let (a, b) = (&self.snapshot.stops()[a], &self.snapshot.stops()[b]);
                    haversine_km(a.coord, target)
                        .total_cmp(&haversine_km(b.coord, target))
                        .then_with(|| a.id.cmp(&b.id))
                });

            let Some(i) = next else { break };
            visited[i] = true;
            current = &self.snapshot.stops()[i];
            path.push(current);
        }

        path
    }
}
