//! Domain types for the route planner.
//!
//! This module contains the core domain model types: coordinates, stops,
//! passenger categories, wallets and priced routes. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod coordinate;
mod error;
mod passenger;
mod route;
mod stop;
mod wallet;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use passenger::{PassengerCategory, UnknownPassengerCategory};
pub use route::{LegMode, RouteCandidate, RouteCategory, RouteLeg};
pub use stop::{
    InvalidStopId, NextStopEdge, Stop, StopId, TransferLink, TransitMode, UnknownTransitMode,
};
pub use wallet::{InvalidBalance, PaymentWallet};
