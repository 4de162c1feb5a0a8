//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs.

use crate::models::Coordinate;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default open-data endpoint (City of Helsinki service map).
pub const DEFAULT_UNITS_API_URL: &str = "https://api.hel.fi/servicemap/v2/unit/";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unit list endpoint of the service map API
    pub units_api_url: String,
    /// Service ID used to filter units down to playgrounds
    pub units_service: String,
    /// Page size requested from the API
    pub page_size: u32,
    /// Maximum number of `next` links followed during a refresh
    pub max_pages: u32,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Snapshot file used instead of the bundled one, if set
    pub snapshot_path: Option<PathBuf>,
    /// Durable key-value store file (favorites, map viewport)
    pub store_path: PathBuf,
    /// Locale used for display names
    pub display_locale: String,
    /// Fixed user location for the headless driver
    pub fixed_location: Option<Coordinate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units_api_url: DEFAULT_UNITS_API_URL.to_string(),
            units_service: "731".to_string(),
            page_size: 1000,
            max_pages: 5,
            request_timeout: Duration::from_secs(15),
            snapshot_path: None,
            store_path: PathBuf::from("playground-map-store.json"),
            display_locale: "fi".to_string(),
            fixed_location: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; malformed numbers fall back to it.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let fixed_location = match env::var("FIXED_LOCATION") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<Coordinate>()
                    .map_err(|e| ConfigError::Invalid("FIXED_LOCATION", e))?,
            ),
            _ => None,
        };

        Ok(Self {
            units_api_url: env::var("UNITS_API_URL").unwrap_or(defaults.units_api_url),
            units_service: env::var("UNITS_SERVICE").unwrap_or(defaults.units_service),
            page_size: parse_or("UNITS_PAGE_SIZE", defaults.page_size),
            max_pages: parse_or("UNITS_MAX_PAGES", defaults.max_pages).max(1),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            snapshot_path: env::var("SNAPSHOT_PATH").ok().map(PathBuf::from),
            store_path: env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            display_locale: env::var("DISPLAY_LOCALE").unwrap_or(defaults.display_locale),
            fixed_location,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
