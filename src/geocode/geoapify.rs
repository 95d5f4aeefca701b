// src/geocode/geoapify.rs
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use super::{AddressResolver, Coordinate};
use crate::config::GeocoderConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Candidate>,
}

/// One ranked match; the service returns the best match first.
#[derive(Debug, Deserialize)]
struct Candidate {
    lat: f64,
    lon: f64,
}

/// Geoapify forward-geocoding client. One GET per call, no retries, no cache.
pub struct GeoapifyResolver {
    client: Client,
    base: Url,
    api_key: String,
}

impl GeoapifyResolver {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("building HTTP client")?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &GeocoderConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("parsing geocoder URL {}", config.base_url))?;
        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
        })
    }

    fn search_url(&self, address: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("text", address)
            .append_pair("format", "json")
            .append_pair("apiKey", &self.api_key);
        url
    }
}

#[async_trait]
impl AddressResolver for GeoapifyResolver {
    async fn resolve(&self, address: &str) -> Result<Coordinate> {
        if address.trim().is_empty() {
            trace!("blank address, skipping lookup");
            return Ok(Coordinate::Unresolved);
        }

        // the full URL carries the API key, keep it out of logs and errors
        let endpoint = self.base.as_str();
        debug!(address, endpoint, "geocoding");

        let body: SearchResponse = self
            .client
            .get(self.search_url(address))
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("GET {} failed", endpoint))?
            .error_for_status()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Non-success status from {}", endpoint))?
            .json::<SearchResponse>()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("decoding response from {}", endpoint))?;

        match body.results.first() {
            Some(best) => Ok(Coordinate::new(best.lat, best.lon)),
            None => bail!("no results for {:?}", address),
        }
    }
}
