//! Stop types: identifiers, transit modes and the outgoing links of a stop.

use std::fmt;

use super::Coordinate;

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Opaque identifier of a stop in the network snapshot (e.g. `"bus_otogar"`).
///
/// The only validation is that ids are non-empty and free of surrounding
/// whitespace.
///
/// # Examples
///
/// ```
/// use route_server::domain::StopId;
///
/// let id = StopId::new("tram_sekapark").unwrap();
/// assert_eq!(id.as_str(), "tram_sekapark");
///
/// assert!(StopId::new("").is_err());
/// assert!(StopId::new(" bus_1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Create a stop id.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidStopId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "stop id cannot be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidStopId {
                reason: "stop id cannot have surrounding whitespace",
            });
        }
        Ok(StopId(s))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an unknown transit mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transit mode: {0:?}")]
pub struct UnknownTransitMode(pub String);

/// The fixed-line modes served by stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitMode {
    Bus,
    Tram,
}

impl TransitMode {
    /// Parse the mode names used in network snapshots (`"bus"`, `"tram"`).
    pub fn parse(s: &str) -> Result<Self, UnknownTransitMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bus" => Ok(TransitMode::Bus),
            "tram" => Ok(TransitMode::Tram),
            _ => Err(UnknownTransitMode(s.to_string())),
        }
    }

    /// The snapshot name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitMode::Bus => "bus",
            TransitMode::Tram => "tram",
        }
    }

    /// The mode a rider switches to at a transfer.
    pub fn other(&self) -> TransitMode {
        match self {
            TransitMode::Bus => TransitMode::Tram,
            TransitMode::Tram => TransitMode::Bus,
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled link from a stop to the next stop on the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStopEdge {
    pub target: StopId,
    pub distance_km: f64,
    pub time_min: f64,
    pub fare: f64,
}

/// A designated connection to a stop of the other mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLink {
    pub target: StopId,
    pub transfer_time_min: f64,
    pub transfer_fare: f64,
}

/// A bus or tram stop as found in the network snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub mode: TransitMode,
    pub coord: Coordinate,
    /// Whether this is the last stop of its line.
    pub terminal: bool,
    pub next_stops: Vec<NextStopEdge>,
    pub transfer: Option<TransferLink>,
}

impl Stop {
    /// Create a stop with no outgoing links.
    pub fn new(id: StopId, name: impl Into<String>, mode: TransitMode, coord: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            mode,
            coord,
            terminal: false,
            next_stops: Vec::new(),
            transfer: None,
        }
    }
}
