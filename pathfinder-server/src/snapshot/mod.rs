//! Snapshot provider: fetching, persisting and indexing the map data.
//!
//! The planner core never talks to the map server; it consumes a
//! [`SnapshotData`] built here. Refreshing produces an entirely new
//! `SnapshotData` which callers swap in atomically; published snapshots are
//! never mutated.

mod client;
mod error;
mod store;
mod types;

pub use client::{MapClient, MapClientConfig};
pub use error::SnapshotError;
pub use store::SnapshotStore;
pub use types::{RawDepartures, RawNetwork, RawRoute, RawRouteStop, RawStation, RawStopTime, RawTrip};

use std::sync::Arc;

use tracing::info;

use crate::domain::Network;

/// One published snapshot: the indexed network, the raw trip departures, and
/// the version tags of the files they came from.
#[derive(Debug, Clone)]
pub struct SnapshotData {
    pub network: Arc<Network>,
    pub departures: Arc<RawDepartures>,
    pub network_version: String,
    pub departures_version: String,
}

impl SnapshotData {
    /// Load the persisted snapshot, fetching and persisting it first when
    /// either file is missing.
    ///
    /// Fails with [`SnapshotError::EmptySource`] if a fetch is needed but no
    /// client is configured.
    pub async fn load_or_fetch(
        store: &SnapshotStore,
        client: Option<&MapClient>,
    ) -> Result<Self, SnapshotError> {
        if store.has_network() && store.has_departures() {
            return Self::from_store(store);
        }

        let client = client.ok_or(SnapshotError::EmptySource)?;
        Self::fetch(store, client).await
    }

    /// Fetch both files from the map server, persist them, and index.
    pub async fn fetch(store: &SnapshotStore, client: &MapClient) -> Result<Self, SnapshotError> {
        let raw_network = client.fetch_network().await?;
        let raw_departures = client.fetch_departures().await?;

        store.save_network(&raw_network)?;
        store.save_departures(&raw_departures)?;

        let data = Self::from_raw(store, raw_network, raw_departures)?;
        info!(
            stations = data.network.station_count(),
            network_version = %data.network_version,
            departures_version = %data.departures_version,
            "fetched map snapshot"
        );
        Ok(data)
    }

    /// Index the snapshot already on disk.
    pub fn from_store(store: &SnapshotStore) -> Result<Self, SnapshotError> {
        let raw_network = store.load_network()?;
        let raw_departures = store.load_departures()?;
        Self::from_raw(store, raw_network, raw_departures)
    }

    fn from_raw(
        store: &SnapshotStore,
        raw_network: RawNetwork,
        raw_departures: RawDepartures,
    ) -> Result<Self, SnapshotError> {
        Ok(Self {
            network: Arc::new(raw_network.to_network()),
            departures: Arc::new(raw_departures),
            network_version: store.network_version()?,
            departures_version: store.departures_version()?,
        })
    }
}
