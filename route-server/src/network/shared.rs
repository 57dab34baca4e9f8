//! Shared, reloadable snapshot holder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::SnapshotError;
use super::{NetworkSnapshot, parse_snapshot};

/// Thread-safe holder of the current network snapshot.
///
/// Requests take an `Arc` of the snapshot that is current when they start
/// and plan against it to completion; a reload swaps in a new snapshot
/// without disturbing requests already running.
#[derive(Clone)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<Arc<NetworkSnapshot>>>,
    source: Option<PathBuf>,
}

impl SharedSnapshot {
    /// Wrap an already-loaded snapshot that has no backing file.
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
            source: None,
        }
    }

    /// Load a snapshot from `path`, remembering the path for reloads.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = read(&path).await?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
            source: Some(path),
        })
    }

    /// The snapshot to plan against.
    pub async fn current(&self) -> Arc<NetworkSnapshot> {
        let guard = self.inner.read().await;
        guard.clone()
    }

    /// Re-read the backing file.
    ///
    /// On success, replaces the current snapshot and returns its stop count.
    /// On failure the existing snapshot is preserved and the error is
    /// returned. Snapshots without a backing file are left untouched.
    pub async fn reload(&self) -> Result<usize, SnapshotError> {
        let Some(path) = &self.source else {
            return Ok(self.current().await.len());
        };

        let snapshot = read(path).await?;
        let count = snapshot.len();

        let mut guard = self.inner.write().await;
        *guard = Arc::new(snapshot);

        Ok(count)
    }
}

async fn read(path: &Path) -> Result<NetworkSnapshot, SnapshotError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_snapshot(&contents)
}
