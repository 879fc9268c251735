//! Runtime configuration for the enricher and its external services.
//!
//! Values start from built-in defaults and can be overridden with environment variables
//! (a `.env` file is honoured by the binary) and then with command-line flags.
use crate::error::LocationEnricherError;
use crate::features::elevation::{DEFAULT_ELEVATION_API_URL, DEFAULT_ELEVATION_DATASET};
use crate::features::geocode::DEFAULT_NOMINATIM_URL;
use clap::ValueEnum;
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("location_enricher/", env!("CARGO_PKG_VERSION"));

/// Which reverse geocoder backs foreground address resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GeocoderKind {
    /// Nearest city from the bundled GeoNames dataset
    Offline,
    /// OpenStreetMap Nominatim over HTTP
    Nominatim,
}

impl FromStr for GeocoderKind {
    type Err = LocationEnricherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" => Ok(GeocoderKind::Offline),
            "nominatim" => Ok(GeocoderKind::Nominatim),
            _ => Err(LocationEnricherError::UnknownGeocoder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnricherConfig {
    pub elevation_api_url: String,
    pub elevation_dataset: String,
    /// Applied to each external lookup separately.
    pub lookup_timeout: Duration,
    pub geocoder: GeocoderKind,
    pub nominatim_url: String,
    pub user_agent: String,
}

impl EnricherConfig {
    pub fn from_env_or_default() -> Result<Self, LocationEnricherError> {
        let mut cfg = Self::default();
        if let Ok(url) = env::var("ELEVATION_API_URL") {
            cfg.elevation_api_url = url;
        }
        if let Ok(dataset) = env::var("ELEVATION_DATASET") {
            cfg.elevation_dataset = dataset;
        }
        if let Ok(secs) = env::var("LOOKUP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => cfg.lookup_timeout = Duration::from_secs(secs),
                Err(_) => warn!(
                    "Ignoring LOOKUP_TIMEOUT_SECS={secs}, using {}s",
                    cfg.lookup_timeout.as_secs()
                ),
            }
        }
        if let Ok(geocoder) = env::var("GEOCODER") {
            cfg.geocoder = geocoder.parse()?;
        }
        if let Ok(url) = env::var("NOMINATIM_URL") {
            cfg.nominatim_url = url;
        }
        if let Ok(user_agent) = env::var("HTTP_USER_AGENT") {
            cfg.user_agent = user_agent;
        }
        Ok(cfg)
    }

    /// Shared client for both HTTP adapters.
    pub fn http_client(&self) -> Result<reqwest::Client, LocationEnricherError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(self.lookup_timeout)
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            elevation_api_url: DEFAULT_ELEVATION_API_URL.to_string(),
            elevation_dataset: DEFAULT_ELEVATION_DATASET.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            geocoder: GeocoderKind::Offline,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoder_kind_parsing() {
        assert_eq!(
            "offline".parse::<GeocoderKind>().unwrap(),
            GeocoderKind::Offline
        );
        assert_eq!(
            " Nominatim ".parse::<GeocoderKind>().unwrap(),
            GeocoderKind::Nominatim
        );
        assert!(matches!(
            "google".parse::<GeocoderKind>(),
            Err(LocationEnricherError::UnknownGeocoder(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let cfg = EnricherConfig::default();
        assert_eq!(cfg.elevation_api_url, "https://api.opentopodata.org");
        assert_eq!(cfg.elevation_dataset, "srtm90m");
        assert_eq!(cfg.lookup_timeout, Duration::from_secs(10));
        assert_eq!(cfg.geocoder, GeocoderKind::Offline);
        assert!(cfg.user_agent.starts_with("location_enricher/"));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(EnricherConfig::default().http_client().is_ok());
    }
}
