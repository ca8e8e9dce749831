//! HTTP client for the map server.

use super::error::SnapshotError;
use super::types::{RawDepartures, RawNetwork};

/// Configuration for the map server client.
#[derive(Debug, Clone)]
pub struct MapClientConfig {
    /// Base URL of the system map (e.g. `https://example.com/system-map`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MapClientConfig {
    /// Create a new config for the given base URL.
    ///
    /// A trailing `/index.html` (as produced by copying the map link from a
    /// browser) is stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        if let Some(stripped) = base_url.strip_suffix("/index.html") {
            base_url = stripped.to_string();
        }
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout_secs: 30,
        }
    }
}

/// Client for the map server's data endpoints.
#[derive(Debug, Clone)]
pub struct MapClient {
    http: reqwest::Client,
    base_url: String,
}

impl MapClient {
    /// Create a new client.
    ///
    /// Fails with [`SnapshotError::EmptySource`] if the base URL is empty.
    pub fn new(config: MapClientConfig) -> Result<Self, SnapshotError> {
        if config.base_url.is_empty() {
            return Err(SnapshotError::EmptySource);
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the station/route reference data.
    pub async fn fetch_network(&self) -> Result<RawNetwork, SnapshotError> {
        self.fetch_json("mtr/api/map/stations-and-routes").await
    }

    /// Fetch the generated trip-departure data.
    pub async fn fetch_departures(&self) -> Result<RawDepartures, SnapshotError> {
        self.fetch_json("mtr/api/map/departures").await
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, SnapshotError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SnapshotError::Json {
            message: e.to_string(),
        })
    }
}
