use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pathfinder_server::snapshot::{MapClient, MapClientConfig, SnapshotData, SnapshotStore};
use pathfinder_server::timetable::TimetableCacheConfig;
use pathfinder_server::web::{AppState, ServerConfig, create_router};

/// How often to re-fetch the map snapshot (6 hours).
const SNAPSHOT_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let link = std::env::var("MAP_LINK").unwrap_or_else(|_| {
        "https://letsplay.minecrafttransitrailway.com/system-map".to_string()
    });
    let network_path = std::env::var("NETWORK_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("mtr-station-data.json"));
    let departures_path = std::env::var("DEPARTURES_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("mtr-route-data.json"));

    let store = SnapshotStore::new(network_path, departures_path);
    let client = MapClient::new(MapClientConfig::new(&link)).expect("Failed to create map client");

    let snapshot = SnapshotData::load_or_fetch(&store, Some(&client))
        .await
        .expect("Failed to load map snapshot");

    let base_ignored_lines: Vec<String> = std::env::var("BASE_IGNORED_LINES")
        .map(|v| {
            v.split(',')
                .map(str::to_string)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let config = ServerConfig::new().with_base_ignored_lines(base_ignored_lines);
    let state = AppState::new(snapshot, &TimetableCacheConfig::default(), config);

    // Periodic snapshot refresh. The fresh version tags mean cached
    // timetables for the old snapshot simply stop being hit.
    let refresh_snapshot = state.snapshot.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SNAPSHOT_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match SnapshotData::fetch(&store, &client).await {
                Ok(data) => *refresh_snapshot.write().await = data,
                Err(e) => error!(error = %e, "snapshot refresh failed"),
            }
        }
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8194));
    info!(%addr, "pathfinder server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
