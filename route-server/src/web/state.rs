//! Application state for the web layer.

use std::sync::Arc;

use crate::network::SharedSnapshot;
use crate::planner::PlannerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The network snapshot, swappable by reloads
    pub snapshot: SharedSnapshot,

    /// Route planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(snapshot: SharedSnapshot, config: PlannerConfig) -> Self {
        Self {
            snapshot,
            config: Arc::new(config),
        }
    }
}
