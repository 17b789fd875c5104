use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{GeocodeError, Geocoder};

/// Client for the AMap (Gaode) web geocoding API.
pub struct AmapGeocoder {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    geocodes: Vec<GeocodeItem>,
}

#[derive(Debug, Deserialize)]
struct GeocodeItem {
    #[serde(default)]
    location: Option<String>,
}

impl AmapGeocoder {
    pub fn new(base_url: &str, key: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), key: key.to_string() })
    }

    pub fn from_config(cfg: &configs::GeocoderConfig) -> Result<Self, GeocodeError> {
        Self::new(&cfg.base_url, &cfg.key, Duration::from_secs(cfg.timeout_secs))
    }
}

#[async_trait]
impl Geocoder for AmapGeocoder {
    #[instrument(skip(self), fields(provider = "amap"))]
    async fn resolve(&self, address: &str) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/v3/geocode/geo", self.base_url);
        let resp = self.client
            .get(&url)
            .query(&[("key", self.key.as_str()), ("address", address), ("output", "JSON")])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(GeocodeError::Network(format!("http status {}", resp.status())));
        }
        let body = resp
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;
        if body.status != "1" {
            let info = body.info.unwrap_or_default();
            warn!(status = %body.status, %info, "geocode rejected by provider");
            return Err(GeocodeError::Provider { status: body.status, info });
        }
        let location = body
            .geocodes
            .into_iter()
            .next()
            .and_then(|g| g.location)
            .filter(|l| !l.trim().is_empty());
        debug!(found = location.is_some(), "geocode resolved");
        Ok(location)
    }
}
