//! Disk snapshot of the stop list.
//!
//! Short-lived processes (one CLI invocation per query) would otherwise
//! fetch every rail stop on each run. The snapshot lets them share one
//! fetch for as long as it stays fresh.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Stop;

use super::error::SnapshotError;

/// Default snapshot TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Snapshot file contents.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    /// When the stops were fetched from upstream.
    fetched_at: DateTime<Utc>,
    stops: Vec<Stop>,
}

/// Configuration for the stop snapshot.
#[derive(Debug, Clone)]
pub struct StopSnapshotConfig {
    /// Path to the snapshot file.
    pub path: PathBuf,
    /// How long a snapshot remains usable.
    pub ttl: Duration,
}

impl StopSnapshotConfig {
    /// Create a new config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A stop list loaded from disk.
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub stops: Vec<Stop>,
}

/// Disk snapshot of the registry's stop list.
#[derive(Debug, Clone)]
pub struct StopSnapshot {
    config: StopSnapshotConfig,
}

impl StopSnapshot {
    /// Create a new snapshot handle with the given config.
    pub fn new(config: StopSnapshotConfig) -> Self {
        Self { config }
    }

    /// Try to load stops from the snapshot.
    ///
    /// Returns `None` if the file doesn't exist, is invalid, is empty or
    /// has expired.
    pub fn load(&self) -> Option<LoadedSnapshot> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let file: SnapshotFile = serde_json::from_str(&contents).ok()?;

        let age = Utc::now().signed_duration_since(file.fetched_at).to_std().ok()?;
        if age >= self.config.ttl || file.stops.is_empty() {
            return None;
        }

        Some(LoadedSnapshot {
            fetched_at: file.fetched_at,
            stops: file.stops,
        })
    }

    /// Write stops to the snapshot.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, stops: &[Stop], fetched_at: DateTime<Utc>) -> Result<(), SnapshotError> {
        let file = SnapshotFile {
            fetched_at,
            stops: stops.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
                message: format!("failed to create snapshot directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(&file)?;

        std::fs::write(&self.config.path, json).map_err(|e| SnapshotError::Io {
            message: format!("failed to write snapshot file: {}", e),
        })?;

        Ok(())
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}
