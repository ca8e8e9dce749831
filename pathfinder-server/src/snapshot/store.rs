//! Disk persistence for the two snapshot files.
//!
//! The reference-data file and the trip-departure file are versioned by
//! filesystem modification time; the timetable cache keys on those version
//! tags to decide when a cached timetable is stale.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::SnapshotError;
use super::types::{RawDepartures, RawNetwork};

/// Disk store for the persisted snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    network_path: PathBuf,
    departures_path: PathBuf,
}

impl SnapshotStore {
    /// Create a store over the two file paths.
    pub fn new(network_path: impl Into<PathBuf>, departures_path: impl Into<PathBuf>) -> Self {
        Self {
            network_path: network_path.into(),
            departures_path: departures_path.into(),
        }
    }

    /// True if the reference-data file exists.
    pub fn has_network(&self) -> bool {
        self.network_path.exists()
    }

    /// True if the trip-departure file exists.
    pub fn has_departures(&self) -> bool {
        self.departures_path.exists()
    }

    /// Load the persisted reference data.
    pub fn load_network(&self) -> Result<RawNetwork, SnapshotError> {
        read_json(&self.network_path)
    }

    /// Persist reference data, creating parent directories if needed.
    pub fn save_network(&self, network: &RawNetwork) -> Result<(), SnapshotError> {
        write_json(&self.network_path, network)
    }

    /// Load the persisted trip-departure data.
    pub fn load_departures(&self) -> Result<RawDepartures, SnapshotError> {
        read_json(&self.departures_path)
    }

    /// Persist trip-departure data, creating parent directories if needed.
    pub fn save_departures(&self, departures: &RawDepartures) -> Result<(), SnapshotError> {
        write_json(&self.departures_path, departures)
    }

    /// Version tag of the reference-data file (its mtime, minute precision).
    pub fn network_version(&self) -> Result<String, SnapshotError> {
        version_of(&self.network_path)
    }

    /// Version tag of the trip-departure file.
    pub fn departures_version(&self) -> Result<String, SnapshotError> {
        version_of(&self.departures_path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| SnapshotError::Json {
        message: e.to_string(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string(value).map_err(|e| SnapshotError::Json {
        message: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Format a file's mtime as a `YYYYMMDD-HHMM` version tag.
fn version_of(path: &Path) -> Result<String, SnapshotError> {
    let mtime = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let mtime: DateTime<Utc> = mtime.into();
    Ok(mtime.format("%Y%m%d-%H%M").to_string())
}
