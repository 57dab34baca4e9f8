//! Weighted routing graph derived from a snapshot.

use tracing::warn;

use crate::domain::{LegMode, StopId};

use super::NetworkSnapshot;

/// Fixed stand-in distance for the walk behind a transfer link.
pub const TRANSFER_DISTANCE_KM: f64 = 0.1;

/// Extra weight charged for changing mode.
pub const TRANSFER_PENALTY: f64 = 1.0;

/// Whether an edge follows a line or changes mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Direct,
    Transfer,
}

/// An outgoing edge between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    /// Position of the target in the snapshot's stop list.
    pub target: usize,
    pub kind: EdgeKind,
    pub distance_km: f64,
    pub time_min: f64,
    pub fare: f64,
    /// The source stop's mode for direct edges, [`LegMode::Transfer`] otherwise.
    pub mode: LegMode,
}

impl GraphEdge {
    /// Composite cost used by the shortest-path solver.
    ///
    /// `2·distance + time/5 + fare/2`, plus [`TRANSFER_PENALTY`] on transfer
    /// edges, clamped at zero. NaN inputs stay NaN so the solver can reject
    /// them.
    pub fn weight(&self) -> f64 {
        let mut w = 2.0 * self.distance_km + self.time_min / 5.0 + self.fare / 2.0;
        if self.kind == EdgeKind::Transfer {
            w += TRANSFER_PENALTY;
        }
        if w < 0.0 { 0.0 } else { w }
    }
}

/// An edge whose target is not in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingEdge {
    pub from: StopId,
    pub target: StopId,
    pub kind: EdgeKind,
}

/// Adjacency lists indexed by snapshot stop position.
///
/// Built once, then only read.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    adjacency: Vec<Vec<GraphEdge>>,
    dangling: Vec<DanglingEdge>,
}

impl NetworkGraph {
    /// Build the graph for a snapshot.
    ///
    /// Edges pointing at unknown stops are skipped and recorded in
    /// [`NetworkGraph::dangling`].
    pub fn build(snapshot: &NetworkSnapshot) -> Self {
        let mut adjacency = Vec::with_capacity(snapshot.len());
        let mut dangling = Vec::new();

        for stop in snapshot.stops() {
            let mut edges = Vec::with_capacity(stop.next_stops.len() + 1);

            for next in &stop.next_stops {
                match snapshot.position(&next.target) {
                    Some(target) => edges.push(GraphEdge {
                        target,
                        kind: EdgeKind::Direct,
                        distance_km: next.distance_km,
                        time_min: next.time_min,
                        fare: next.fare,
                        mode: stop.mode.into(),
                    }),
                    None => {
                        warn!(from = %stop.id, target = %next.target, "skipping dangling edge");
                        dangling.push(DanglingEdge {
                            from: stop.id.clone(),
                            target: next.target.clone(),
                            kind: EdgeKind::Direct,
                        });
                    }
                }
            }

            if let Some(link) = &stop.transfer {
                match snapshot.position(&link.target) {
                    Some(target) => edges.push(GraphEdge {
                        target,
                        kind: EdgeKind::Transfer,
                        distance_km: TRANSFER_DISTANCE_KM,
                        time_min: link.transfer_time_min,
                        fare: link.transfer_fare,
                        mode: LegMode::Transfer,
                    }),
                    None => {
                        warn!(from = %stop.id, target = %link.target, "skipping dangling transfer");
                        dangling.push(DanglingEdge {
                            from: stop.id.clone(),
                            target: link.target.clone(),
                            kind: EdgeKind::Transfer,
                        });
                    }
                }
            }

            adjacency.push(edges);
        }

        Self {
            adjacency,
            dangling,
        }
    }

    /// Outgoing edges of the stop at `position`.
    pub fn edges(&self, position: usize) -> &[GraphEdge] {
        self.adjacency
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges skipped during the build.
    pub fn dangling(&self) -> &[DanglingEdge] {
        &self.dangling
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, NextStopEdge, Stop, TransferLink, TransitMode};
    use crate::fare::TaxiTariff;

    fn id(s: &str) -> StopId {
        StopId::new(s).unwrap()
    }

    fn stop(name: &str, mode: TransitMode, next: &[(&str, f64, f64, f64)]) -> Stop {
        let mut stop = Stop::new(id(name), name, mode, Coordinate::new(40.76, 29.94).unwrap());
        stop.next_stops = next
            .iter()
            .map(|&(target, distance_km, time_min, fare)| NextStopEdge {
                target: id(target),
                distance_km,
                time_min,
                fare,
            })
            .collect();
        stop
    }

    fn snapshot(stops: Vec<Stop>) -> NetworkSnapshot {
        NetworkSnapshot::new("Izmit", TaxiTariff::new(10.0, 4.0).unwrap(), stops).unwrap()
    }

    #[test]
    fn builds_direct_and_transfer_edges() {
        let mut bus_b = stop("bus_b", TransitMode::Bus, &[]);
        bus_b.transfer = Some(TransferLink {
            target: id("tram_b"),
            transfer_time_min: 2.0,
            transfer_fare: 0.0,
        });

        let graph = NetworkGraph::build(&snapshot(vec![
            stop("bus_a", TransitMode::Bus, &[("bus_b", 1.5, 5.0, 3.0)]),
            bus_b,
            stop("tram_b", TransitMode::Tram, &[]),
        ]));

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.dangling().is_empty());

        let direct = &graph.edges(0)[0];
        assert_eq!(direct.target, 1);
        assert_eq!(direct.kind, EdgeKind::Direct);
        assert_eq!(direct.mode, LegMode::Bus);

        let transfer = &graph.edges(1)[0];
        assert_eq!(transfer.target, 2);
        assert_eq!(transfer.kind, EdgeKind::Transfer);
        assert_eq!(transfer.distance_km, TRANSFER_DISTANCE_KM);
        assert_eq!(transfer.mode, LegMode::Transfer);
    }

    #[test]
    fn skips_dangling_edges() {
        let graph = NetworkGraph::build(&snapshot(vec![stop(
            "bus_a",
            TransitMode::Bus,
            &[("bus_gone", 1.0, 3.0, 2.0)],
        )]));

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.dangling().len(), 1);
        assert_eq!(graph.dangling()[0].target.as_str(), "bus_gone");
    }

    #[test]
    fn weights() {
        let direct = GraphEdge {
            target: 0,
            kind: EdgeKind::Direct,
            distance_km: 1.5,
            time_min: 5.0,
            fare: 3.0,
            mode: LegMode::Bus,
        };
        // 3.0 + 1.0 + 1.5
        assert!((direct.weight() - 5.5).abs() < 1e-9);

        let transfer = GraphEdge {
            kind: EdgeKind::Transfer,
            distance_km: TRANSFER_DISTANCE_KM,
            time_min: 2.0,
            fare: 0.0,
            mode: LegMode::Transfer,
            ..direct.clone()
        };
        // 0.2 + 0.4 + 0 + 1
        assert!((transfer.weight() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn negative_weight_clamps_to_zero() {
        let edge = GraphEdge {
            target: 0,
            kind: EdgeKind::Direct,
            distance_km: 0.0,
            time_min: 0.0,
            fare: -5.0,
            mode: LegMode::Bus,
        };
        assert_eq!(edge.weight(), 0.0);
    }

    #[test]
    fn out_of_range_position_has_no_edges() {
        let graph = NetworkGraph::build(&snapshot(vec![stop("bus_a", TransitMode::Bus, &[])]));
        assert!(graph.edges(7).is_empty());
    }
}
