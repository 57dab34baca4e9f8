//! Network snapshot error types.

use std::path::PathBuf;

use crate::domain::StopId;

/// Errors that can occur when loading or validating a network snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading the snapshot file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid snapshot JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot lists no stops
    #[error("network has no stops")]
    EmptyNetwork,

    /// Two stops share an id
    #[error("duplicate stop id: {0}")]
    DuplicateStop(StopId),

    /// A stop entry failed validation
    #[error("invalid stop {id:?}: {message}")]
    InvalidStop { id: String, message: String },

    /// The taxi tariff failed validation
    #[error("invalid taxi tariff: {0}")]
    InvalidTariff(String),
}
