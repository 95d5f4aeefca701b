// src/config.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};
use url::Url;

/// Optional override file, looked up relative to the working directory.
pub const CONFIG_FILE: &str = "openmic.yml";

static OPEN_MIC_RAW_CSV_PATH: &str = "data/wa_open_mic_data.csv";
static OPEN_MIC_CLEAN_CSV_PATH: &str = "data/clean_open_mic_data.csv";

static GEOAPIFY_QUERY_URL: &str = "https://api.geoapify.com/v1/geocode/search";
static GEOAPIFY_API_KEY: &str = "XXXXX";

static HEADER_MAPPING: &[(&str, &str)] = &[
    ("Name (club)", "Name"),
    ("Location", "Address"),
    ("Time Signup/Start", "Signup/Start"),
];

static HEADERS_TO_REMOVE: &[&str] = &[
    "Wheelchair accessible",
    "Age requirement",
    "Open mic type",
    "Email",
    "Parking",
    "Phone",
];

const REQUEST_DELAY_MS: u64 = 1_000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything one run of the pipeline needs, passed explicitly to each stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Old column name → new column name. Unlisted columns keep their name.
    pub header_mapping: BTreeMap<String, String>,
    /// Column names dropped after renaming (so these are *new* names).
    pub headers_to_remove: BTreeSet<String>,
    pub address_column: String,
    pub coordinates_column: String,
    /// Minimum pause between the end of one lookup and the start of the next.
    pub request_delay_ms: u64,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(OPEN_MIC_RAW_CSV_PATH),
            output_path: PathBuf::from(OPEN_MIC_CLEAN_CSV_PATH),
            header_mapping: HEADER_MAPPING
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            headers_to_remove: HEADERS_TO_REMOVE.iter().map(|h| h.to_string()).collect(),
            address_column: "Address".to_string(),
            coordinates_column: "Coordinates".to_string(),
            request_delay_ms: REQUEST_DELAY_MS,
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: GEOAPIFY_QUERY_URL.to_string(),
            api_key: GEOAPIFY_API_KEY.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise fall back to the compiled-in defaults.
    /// Fields missing from the file keep their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reject settings that would make the run meaningless before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.geocoder.base_url)
            .with_context(|| format!("invalid geocoder base_url {:?}", self.geocoder.base_url))?;

        if self.address_column.trim().is_empty() {
            bail!("address_column must not be empty");
        }
        if self.coordinates_column.trim().is_empty() {
            bail!("coordinates_column must not be empty");
        }
        if self.geocoder.api_key.is_empty() || self.geocoder.api_key == GEOAPIFY_API_KEY {
            warn!("geocoder api_key is not set; every lookup will likely fail");
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
