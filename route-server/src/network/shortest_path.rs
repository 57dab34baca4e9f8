//! Dijkstra over the routing graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use super::graph::{GraphEdge, NetworkGraph};

/// Invalid input to the solver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The start or end position is not a node of the graph
    #[error("unknown stop position: {0}")]
    UnknownStop(usize),

    /// An edge weight is negative or NaN
    #[error("invalid edge weight {weight} from stop {from} to stop {to}")]
    InvalidWeight { from: usize, to: usize, weight: f64 },

    /// The search did not settle within its iteration budget
    #[error("search exceeded {0} iterations")]
    IterationLimit(usize),
}

/// One node on a path, with the edge used to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub position: usize,
    /// `None` for the first step.
    pub via: Option<GraphEdge>,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Total weight, `f64::INFINITY` when the target is unreachable.
    pub cost: f64,
    /// Steps from start to target, empty when unreachable.
    pub steps: Vec<PathStep>,
}

impl ShortestPath {
    fn unreachable() -> Self {
        Self {
            cost: f64::INFINITY,
            steps: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.steps.is_empty()
    }
}

#[derive(Debug)]
struct QueueEntry {
    cost: f64,
    seq: u64,
    position: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the max-heap pops the cheapest, then earliest pushed, entry
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cheapest path from `from` to `to` by [`GraphEdge::weight`].
///
/// Equal-cost frontier entries are expanded in insertion order, so the
/// returned path is deterministic. An unreachable target is not an error; it
/// yields an infinite cost and an empty path.
pub fn shortest_path(
    graph: &NetworkGraph,
    from: usize,
    to: usize,
) -> Result<ShortestPath, PathError> {
    let n = graph.len();
    if from >= n {
        return Err(PathError::UnknownStop(from));
    }
    if to >= n {
        return Err(PathError::UnknownStop(to));
    }

    let mut best = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<(usize, &GraphEdge)>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    // Each edge can push at most one entry, so more pops than this means
    // the graph is not what it claims to be
    let limit = graph.edge_count() + n + 1;
    let mut iterations = 0usize;

    best[from] = 0.0;
    heap.push(QueueEntry {
        cost: 0.0,
        seq,
        position: from,
    });

    while let Some(QueueEntry { cost, position, .. }) = heap.pop() {
        iterations += 1;
        if iterations > limit {
            return Err(PathError::IterationLimit(limit));
        }

        if settled[position] {
            continue;
        }
        settled[position] = true;

        if position == to {
            break;
        }

        for edge in graph.edges(position) {
            let weight = edge.weight();
            if weight.is_nan() || weight < 0.0 {
                return Err(PathError::InvalidWeight {
                    from: position,
                    to: edge.target,
                    weight,
                });
            }

            let next = cost + weight;
            if next < best[edge.target] {
                best[edge.target] = next;
                previous[edge.target] = Some((position, edge));
                seq += 1;
                heap.push(QueueEntry {
                    cost: next,
                    seq,
                    position: edge.target,
                });
            }
        }
    }

    if !settled[to] {
        trace!(from, to, iterations, "target unreachable");
        return Ok(ShortestPath::unreachable());
    }

    let mut steps = Vec::new();
    let mut current = to;
    while let Some((prev, edge)) = previous[current] {
        steps.push(PathStep {
            position: current,
            via: Some(edge.clone()),
        });
        current = prev;
    }
    steps.push(PathStep {
        position: from,
        via: None,
    });
    steps.reverse();

    trace!(from, to, cost = best[to], hops = steps.len() - 1, "path found");

    Ok(ShortestPath {
        cost: best[to],
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, NextStopEdge, Stop, StopId, TransferLink, TransitMode};
    use crate::fare::TaxiTariff;
    use crate::network::{EdgeKind, NetworkSnapshot};

    fn id(s: &str) -> StopId {
        StopId::new(s).unwrap()
    }

    fn stop(name: &str, mode: TransitMode, next: &[(&str, f64)]) -> Stop {
        let mut stop = Stop::new(id(name), name, mode, Coordinate::new(40.76, 29.94).unwrap());
        stop.next_stops = next
            .iter()
            .map(|&(target, distance_km)| NextStopEdge {
                target: id(target),
                distance_km,
                time_min: 0.0,
                fare: 0.0,
            })
            .collect();
        stop
    }

    fn graph(stops: Vec<Stop>) -> NetworkGraph {
        let snapshot =
            NetworkSnapshot::new("Izmit", TaxiTariff::new(10.0, 4.0).unwrap(), stops).unwrap();
        NetworkGraph::build(&snapshot)
    }

    fn positions(path: &ShortestPath) -> Vec<usize> {
        path.steps.iter().map(|s| s.position).collect()
    }

    #[test]
    fn picks_cheaper_route() {
        // a -> b -> d costs 2 + 2, a -> c -> d costs 1 + 1
        let g = graph(vec![
            stop("a", TransitMode::Bus, &[("b", 1.0), ("c", 0.5)]),
            stop("b", TransitMode::Bus, &[("d", 1.0)]),
            stop("c", TransitMode::Bus, &[("d", 0.5)]),
            stop("d", TransitMode::Bus, &[]),
        ]);

        let path = shortest_path(&g, 0, 3).unwrap();
        assert_eq!(positions(&path), [0, 2, 3]);
        assert!((path.cost - 2.0).abs() < 1e-9);
        assert!(path.steps[0].via.is_none());
        assert_eq!(path.steps[1].via.as_ref().unwrap().kind, EdgeKind::Direct);
    }

    #[test]
    fn unreachable_target() {
        let g = graph(vec![
            stop("a", TransitMode::Bus, &[]),
            stop("b", TransitMode::Bus, &[("a", 1.0)]),
        ]);

        let path = shortest_path(&g, 0, 1).unwrap();
        assert!(!path.is_reachable());
        assert!(path.cost.is_infinite());
        assert!(path.steps.is_empty());
    }

    #[test]
    fn start_equals_target() {
        let g = graph(vec![stop("a", TransitMode::Bus, &[])]);
        let path = shortest_path(&g, 0, 0).unwrap();
        assert_eq!(positions(&path), [0]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn equal_cost_ties_follow_insertion_order() {
        // Both a -> b -> d and a -> c -> d cost 4; b is pushed first
        let g = graph(vec![
            stop("a", TransitMode::Bus, &[("b", 1.0), ("c", 1.0)]),
            stop("b", TransitMode::Bus, &[("d", 1.0)]),
            stop("c", TransitMode::Bus, &[("d", 1.0)]),
            stop("d", TransitMode::Bus, &[]),
        ]);

        for _ in 0..5 {
            let path = shortest_path(&g, 0, 3).unwrap();
            assert_eq!(positions(&path), [0, 1, 3]);
        }
    }

    #[test]
    fn follows_transfer_edges() {
        let mut bus_b = stop("bus_b", TransitMode::Bus, &[]);
        bus_b.transfer = Some(TransferLink {
            target: id("tram_b"),
            transfer_time_min: 2.0,
            transfer_fare: 0.0,
        });

        let g = graph(vec![
            stop("bus_a", TransitMode::Bus, &[("bus_b", 1.0)]),
            bus_b,
            stop("tram_b", TransitMode::Tram, &[("tram_c", 1.0)]),
            stop("tram_c", TransitMode::Tram, &[]),
        ]);

        let path = shortest_path(&g, 0, 3).unwrap();
        assert_eq!(positions(&path), [0, 1, 2, 3]);
        assert_eq!(path.steps[2].via.as_ref().unwrap().kind, EdgeKind::Transfer);
    }

    #[test]
    fn rejects_nan_weight() {
        let mut a = stop("a", TransitMode::Bus, &[("b", 1.0)]);
        a.next_stops[0].fare = f64::NAN;
        let g = graph(vec![a, stop("b", TransitMode::Bus, &[])]);

        assert!(matches!(
            shortest_path(&g, 0, 1),
            Err(PathError::InvalidWeight { from: 0, to: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_positions() {
        let g = graph(vec![stop("a", TransitMode::Bus, &[])]);
        assert_eq!(shortest_path(&g, 0, 4), Err(PathError::UnknownStop(4)));
        assert_eq!(shortest_path(&g, 9, 0), Err(PathError::UnknownStop(9)));
    }

    #[test]
    fn zero_weight_cycles_terminate() {
        let g = graph(vec![
            stop("a", TransitMode::Bus, &[("b", 0.0)]),
            stop("b", TransitMode::Bus, &[("a", 0.0)]),
            stop("c", TransitMode::Bus, &[]),
        ]);

        let path = shortest_path(&g, 0, 2).unwrap();
        assert!(!path.is_reachable());
    }
}
