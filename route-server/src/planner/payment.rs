//! Payment feasibility of route candidates.

use crate::domain::{PaymentWallet, RouteCandidate};

/// Whether `cost` can be paid from the pool a leg draws on.
///
/// Farecard legs (bus, tram, transfer) draw on the farecard; everything else
/// draws on cash plus credit card.
pub fn viable(wallet: &PaymentWallet, cost: f64, requires_farecard: bool) -> bool {
    if requires_farecard {
        wallet.farecard() >= cost
    } else {
        wallet.taxi_funds() >= cost
    }
}

/// Whether the wallet covers a whole candidate.
///
/// Costs are summed per pool and each sum must be covered by its own pool.
pub fn can_afford(wallet: &PaymentWallet, candidate: &RouteCandidate) -> bool {
    viable(wallet, candidate.farecard_cost(), true) && viable(wallet, candidate.taxi_cost(), false)
}

/// Drop every candidate the wallet can't pay for.
pub fn retain_affordable(wallet: &PaymentWallet, candidates: &mut Vec<RouteCandidate>) {
    candidates.retain(|c| can_afford(wallet, c));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, LegMode, RouteCategory, RouteLeg};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    /// Taxi to a stop, then a bus ride.
    fn hybrid(taxi_cost: f64, bus_cost: f64) -> RouteCandidate {
        let a = coord(40.76, 29.90);
        let b = coord(40.76, 29.93);
        let c = coord(40.76, 29.98);
        RouteCandidate::new(
            RouteCategory::TaxiTransit,
            vec![
                RouteLeg::new(LegMode::Taxi, a, b, 2.5, 4, taxi_cost).unwrap(),
                RouteLeg::new(LegMode::Bus, b, c, 4.2, 13, bus_cost).unwrap(),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn pools_are_checked_independently() {
        let route = hybrid(20.0, 15.4);

        let enough = PaymentWallet::new(10.0, 10.0, 16.0).unwrap();
        assert!(can_afford(&enough, &route));

        // Plenty of cash can't pay the bus
        let short_farecard = PaymentWallet::new(100.0, 0.0, 15.0).unwrap();
        assert!(!can_afford(&short_farecard, &route));

        // A big farecard can't pay the taxi
        let short_cash = PaymentWallet::new(5.0, 5.0, 100.0).unwrap();
        assert!(!can_afford(&short_cash, &route));
    }

    #[test]
    fn exact_balance_is_enough() {
        let wallet = PaymentWallet::new(20.0, 0.0, 15.4).unwrap();
        assert!(can_afford(&wallet, &hybrid(20.0, 15.4)));
    }

    #[test]
    fn unlimited_wallet_pays_anything() {
        assert!(can_afford(&PaymentWallet::unlimited(), &hybrid(1e6, 1e6)));
    }

    #[test]
    fn free_routes_need_no_balance() {
        let wallet = PaymentWallet::from_partial(None, None, None).unwrap();
        let walk = RouteCandidate::new(
            RouteCategory::Walking,
            vec![
                RouteLeg::new(LegMode::Walk, coord(40.76, 29.90), coord(40.76, 29.91), 0.84, 10, 0.0)
                    .unwrap(),
            ],
            vec![],
        )
        .unwrap();
        assert!(can_afford(&wallet, &walk));
    }

    #[test]
    fn retain_drops_unaffordable() {
        let wallet = PaymentWallet::new(50.0, 0.0, 10.0).unwrap();
        let mut routes = vec![hybrid(20.0, 15.4), hybrid(20.0, 7.0)];
        retain_affordable(&wallet, &mut routes);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].farecard_cost(), 7.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Coordinate, LegMode, RouteCategory, RouteLeg};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn survivors_fit_their_pools(
            taxi in 0.0f64..80.0,
            ride in 0.0f64..40.0,
            cash in 0.0f64..60.0,
            card in 0.0f64..60.0,
            farecard in 0.0f64..40.0,
        ) {
            let a = Coordinate::new(40.76, 29.90).unwrap();
            let b = Coordinate::new(40.76, 29.93).unwrap();
            let c = Coordinate::new(40.76, 29.98).unwrap();
            let route = RouteCandidate::new(
                RouteCategory::TaxiTransit,
                vec![
                    RouteLeg::new(LegMode::Taxi, a, b, 2.5, 4, taxi).unwrap(),
                    RouteLeg::new(LegMode::Tram, b, c, 4.2, 10, ride).unwrap(),
                ],
                vec![],
            )
            .unwrap();

            let wallet = PaymentWallet::new(cash, card, farecard).unwrap();
            let mut routes = vec![route];
            retain_affordable(&wallet, &mut routes);

            for r in &routes {
                prop_assert!(r.farecard_cost() <= wallet.farecard());
                prop_assert!(r.taxi_cost() <= wallet.taxi_funds());
            }
        }
    }
}
