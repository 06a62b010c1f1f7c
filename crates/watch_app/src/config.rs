//! Startup configuration, read once from the environment.

use std::time::Duration;

use log::LevelFilter;
use thiserror::Error;
use watch_core::TrackedTarget;
use watch_engine::DEFAULT_POLL_INTERVAL;

pub const PLACE_ID: &str = "PLACE_ID";
pub const TAXON_IDS: &str = "TAXON_IDS";
pub const NTFY_URL: &str = "NTFY_URL";
pub const NTFY_TOKEN: &str = "NTFY_TOKEN";
pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("NTFY_TOKEN needs to be set.")]
    MissingToken,
    #[error("NTFY_URL should be the URL to your ntfy topic.")]
    MissingUrl,
    #[error("NTFY_URL is not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("PLACE_ID should be the numeric iNaturalist place ID.")]
    MissingPlace,
    #[error("Unable to convert place ID '{0}' to an integer.")]
    InvalidPlace(String),
    #[error("TAXON_IDS should be a list of taxon IDs, separated by commas. No spaces.")]
    MissingTaxa,
    #[error("Unable to convert taxon ID '{0}' to an integer. TAXON_IDS takes commas and no spaces.")]
    InvalidTaxon(String),
    #[error("POLL_INTERVAL_SECS should be a positive number of seconds, got '{0}'.")]
    InvalidInterval(String),
    #[error("LOG_LEVEL '{0}' is not one of error, warn, info, debug, trace, off.")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub place_id: u64,
    pub taxon_ids: Vec<u64>,
    pub ntfy_url: String,
    pub ntfy_token: String,
    pub poll_interval: Duration,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let ntfy_token = get(NTFY_TOKEN).ok_or(ConfigError::MissingToken)?;
        let ntfy_url = get(NTFY_URL).ok_or(ConfigError::MissingUrl)?;
        url::Url::parse(&ntfy_url).map_err(|err| ConfigError::InvalidUrl(err.to_string()))?;
        let place_raw = get(PLACE_ID).ok_or(ConfigError::MissingPlace)?;
        let taxa_raw = get(TAXON_IDS).ok_or(ConfigError::MissingTaxa)?;

        let place_id = place_raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPlace(place_raw.clone()))?;
        let taxon_ids = parse_taxon_ids(&taxa_raw)?;

        let poll_interval = match get(POLL_INTERVAL_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidInterval(raw)),
            },
            None => DEFAULT_POLL_INTERVAL,
        };

        let log_level = match get(LOG_LEVEL) {
            Some(raw) => {
                watch_logging::parse_level(&raw).ok_or(ConfigError::InvalidLogLevel(raw))?
            }
            None => LevelFilter::Info,
        };

        Ok(Self {
            place_id,
            taxon_ids,
            ntfy_url,
            ntfy_token,
            poll_interval,
            log_level,
        })
    }

    pub fn targets(&self) -> Vec<TrackedTarget> {
        TrackedTarget::for_place(self.place_id, &self.taxon_ids)
    }
}

fn parse_taxon_ids(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| ConfigError::InvalidTaxon(part.to_string()))
        })
        .collect()
}
