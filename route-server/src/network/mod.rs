//! The transit network: the immutable snapshot of stops and tariffs, and the
//! structures derived from it for routing.
//!
//! A [`NetworkSnapshot`] is validated once when it is loaded and then only
//! read, so any number of planning requests can share it through an `Arc`.

mod error;
mod graph;
mod loader;
mod nearest;
mod shared;
mod shortest_path;

pub use error::SnapshotError;
pub use graph::{DanglingEdge, EdgeKind, GraphEdge, NetworkGraph, TRANSFER_DISTANCE_KM};
pub use loader::{load_snapshot, parse_snapshot};
pub use nearest::{NearbyStop, nearest_stops};
pub use shared::SharedSnapshot;
pub use shortest_path::{PathError, PathStep, ShortestPath, shortest_path};

use std::collections::HashMap;

use crate::domain::{Stop, StopId, TransitMode};
use crate::fare::{FareModel, TaxiTariff};

/// A validated, read-only view of one city's network.
///
/// # Invariants
///
/// - At least one stop
/// - Stop ids are unique
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    city: String,
    taxi: TaxiTariff,
    stops: Vec<Stop>,
    index: HashMap<StopId, usize>,
}

impl NetworkSnapshot {
    /// Build a snapshot, validating the stop list.
    ///
    /// Edges that point at unknown stops are kept; the routing graph skips
    /// them.
    pub fn new(
        city: impl Into<String>,
        taxi: TaxiTariff,
        stops: Vec<Stop>,
    ) -> Result<Self, SnapshotError> {
        if stops.is_empty() {
            return Err(SnapshotError::EmptyNetwork);
        }

        let mut index = HashMap::with_capacity(stops.len());
        for (i, stop) in stops.iter().enumerate() {
            if index.insert(stop.id.clone(), i).is_some() {
                return Err(SnapshotError::DuplicateStop(stop.id.clone()));
            }
        }

        Ok(Self {
            city: city.into(),
            taxi,
            stops,
            index,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn taxi_tariff(&self) -> TaxiTariff {
        self.taxi
    }

    /// Fare model priced with this city's taxi tariff.
    pub fn fare_model(&self) -> FareModel {
        FareModel::new(self.taxi)
    }

    /// All stops in snapshot order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.index.get(id).map(|&i| &self.stops[i])
    }

    /// Position of a stop in [`NetworkSnapshot::stops`].
    pub fn position(&self, id: &StopId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Stops served by `mode`, in snapshot order.
    pub fn stops_of_mode(&self, mode: TransitMode) -> impl Iterator<Item = &Stop> + '_ {
        self.stops.iter().filter(move |s| s.mode == mode)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
