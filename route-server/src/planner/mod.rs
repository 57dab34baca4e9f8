//! Multi-modal route planner.
//!
//! Given a start and end coordinate, this module proposes walking, taxi, bus,
//! tram, mixed bus/tram and taxi + transit routes over a network snapshot,
//! prices them for the rider's passenger category, drops what the rider's
//! wallet can't pay for, and ranks the rest.

mod config;
mod payment;
mod rank;
mod search;
mod synth;

pub use config::PlannerConfig;
pub use payment::{can_afford, retain_affordable, viable};
pub use rank::{rank_category, score, select_best};
pub use search::{PlanError, PlanOutcome, PlanRequest, PlanResult, Planner};
pub use synth::{RouteSynthesizer, Trip, TripKind};
