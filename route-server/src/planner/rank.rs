//! Route ranking.
//!
//! Within a category candidates are ordered by cost, then time, then
//! distance. Across categories a weighted score picks the single best route.

use std::cmp::Ordering;

use crate::domain::RouteCandidate;

/// Cost that counts as a full unit in [`score`].
pub const COST_SCALE: f64 = 50.0;

/// Minutes that count as a full unit in [`score`].
pub const TIME_SCALE_MIN: f64 = 120.0;

/// Kilometres that count as a full unit in [`score`].
pub const DISTANCE_SCALE_KM: f64 = 20.0;

/// Normalized score, lower is better.
///
/// `0.4·cost/50 + 0.4·time/120 + 0.2·distance/20`
pub fn score(candidate: &RouteCandidate) -> f64 {
    0.4 * (candidate.total_cost() / COST_SCALE)
        + 0.4 * (candidate.total_time_min() as f64 / TIME_SCALE_MIN)
        + 0.2 * (candidate.total_distance_km() / DISTANCE_SCALE_KM)
}

/// Compare by (total cost, total time, total distance).
fn by_totals(a: &RouteCandidate, b: &RouteCandidate) -> Ordering {
    a.total_cost()
        .total_cmp(&b.total_cost())
        .then_with(|| a.total_time_min().cmp(&b.total_time_min()))
        .then_with(|| a.total_distance_km().total_cmp(&b.total_distance_km()))
}

/// Sort one category's candidates best-first and keep at most `keep`.
///
/// The sort is stable, so fully tied candidates keep their synthesis order.
pub fn rank_category(mut candidates: Vec<RouteCandidate>, keep: usize) -> Vec<RouteCandidate> {
    candidates.sort_by(by_totals);
    candidates.truncate(keep);
    candidates
}

/// The best candidate overall.
///
/// Minimum [`score`]; ties fall back to the per-category order and then to
/// category declaration order. The first of any remaining exact tie wins.
pub fn select_best<'a, I>(candidates: I) -> Option<&'a RouteCandidate>
where
    I: IntoIterator<Item = &'a RouteCandidate>,
{
    candidates.into_iter().min_by(|a, b| {
        score(a)
            .total_cmp(&score(b))
            .then_with(|| by_totals(a, b))
            .then_with(|| a.category().cmp(&b.category()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, LegMode, RouteCategory, RouteLeg};

    fn route(category: RouteCategory, distance_km: f64, time_min: u32, cost: f64) -> RouteCandidate {
        let mode = match category {
            RouteCategory::Walking => LegMode::Walk,
            RouteCategory::TaxiOnly => LegMode::Taxi,
            RouteCategory::TramOnly => LegMode::Tram,
            _ => LegMode::Bus,
        };
        RouteCandidate::new(
            category,
            vec![
                RouteLeg::new(
                    mode,
                    Coordinate::new(40.76, 29.90).unwrap(),
                    Coordinate::new(40.78, 29.95).unwrap(),
                    distance_km,
                    time_min,
                    cost,
                )
                .unwrap(),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn score_formula() {
        let r = route(RouteCategory::BusOnly, 10.0, 60, 25.0);
        // 0.4 * 0.5 + 0.4 * 0.5 + 0.2 * 0.5
        assert!((score(&r) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn category_order_is_cost_time_distance() {
        let ranked = rank_category(
            vec![
                route(RouteCategory::BusOnly, 5.0, 20, 12.0),
                route(RouteCategory::BusOnly, 6.0, 15, 9.0),
                route(RouteCategory::BusOnly, 4.0, 15, 9.0),
                route(RouteCategory::BusOnly, 3.0, 25, 9.0),
            ],
            3,
        );

        let keys: Vec<_> = ranked
            .iter()
            .map(|r| (r.total_cost(), r.total_time_min(), r.total_distance_km()))
            .collect();
        assert_eq!(keys, [(9.0, 15, 4.0), (9.0, 15, 6.0), (9.0, 25, 3.0)]);
    }

    #[test]
    fn keeps_at_most_n() {
        let many = (0..7)
            .map(|i| route(RouteCategory::TramOnly, 3.0, 10 + i, 7.0))
            .collect();
        assert_eq!(rank_category(many, 3).len(), 3);
    }

    #[test]
    fn best_by_score() {
        let walk = route(RouteCategory::Walking, 2.0, 24, 0.0);
        let taxi = route(RouteCategory::TaxiOnly, 2.0, 3, 18.0);
        let bus = route(RouteCategory::BusOnly, 2.4, 14, 11.8);

        // walk 0.08 + 0.02, taxi 0.144 + 0.01 + 0.02, bus 0.0944 + 0.0467 + 0.024
        let all = [walk.clone(), taxi, bus];
        assert_eq!(select_best(&all), Some(&walk));
    }

    #[test]
    fn score_ties_break_on_category() {
        let bus = route(RouteCategory::BusOnly, 5.0, 20, 10.0);
        let tram = route(RouteCategory::TramOnly, 5.0, 20, 10.0);

        let best = select_best([&tram, &bus]).unwrap();
        assert_eq!(best.category(), RouteCategory::BusOnly);
    }

    #[test]
    fn empty_has_no_best() {
        assert!(select_best(&Vec::<RouteCandidate>::new()).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Coordinate, LegMode, RouteCategory, RouteLeg};
    use proptest::prelude::*;

    fn arb_route() -> impl Strategy<Value = RouteCandidate> {
        (0usize..6, 0.0f64..30.0, 0u32..180, 0.0f64..100.0).prop_map(|(c, d, t, cost)| {
            let category = RouteCategory::ALL[c];
            RouteCandidate::new(
                category,
                vec![
                    RouteLeg::new(
                        LegMode::Bus,
                        Coordinate::new(40.76, 29.90).unwrap(),
                        Coordinate::new(40.78, 29.95).unwrap(),
                        d,
                        t,
                        cost,
                    )
                    .unwrap(),
                ],
                vec![],
            )
            .unwrap()
        })
    }

    proptest! {
        #[test]
        fn ranking_is_sorted_and_bounded(routes in prop::collection::vec(arb_route(), 0..12)) {
            let ranked = rank_category(routes.clone(), 3);
            prop_assert_eq!(ranked.len(), routes.len().min(3));
            for pair in ranked.windows(2) {
                prop_assert!(by_totals(&pair[0], &pair[1]) != Ordering::Greater);
            }
        }

        #[test]
        fn best_ignores_input_order(routes in prop::collection::vec(arb_route(), 1..12)) {
            let forward = select_best(&routes).cloned();
            let mut reversed = routes.clone();
            reversed.reverse();
            let backward = select_best(&reversed).cloned();

            prop_assert!(forward.is_some());
            let (f, b) = (forward.unwrap(), backward.unwrap());
            prop_assert_eq!(score(&f), score(&b));
            prop_assert_eq!(by_totals(&f, &b), Ordering::Equal);
            prop_assert_eq!(f.category(), b.category());
        }

        #[test]
        fn best_has_minimum_score(routes in prop::collection::vec(arb_route(), 1..12)) {
            let best = select_best(&routes).unwrap();
            for r in &routes {
                prop_assert!(score(best) <= score(r));
            }
        }
    }
}
