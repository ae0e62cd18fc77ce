//! Run configuration.
//!
//! Everything is read from `FAHRPLAN_*` environment variables. Only the API
//! token and the station list have no default; [`ExtractConfig::check_required`]
//! reports their absence before any output is touched.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::crawl::CrawlConfig;
use crate::fahrplan::{DEFAULT_BASE_URL, FahrplanConfig};

pub const ENV_API_TOKEN: &str = "FAHRPLAN_API_TOKEN";
pub const ENV_STATIONS: &str = "FAHRPLAN_STATIONS";
pub const ENV_DELIMITER: &str = "FAHRPLAN_STATIONS_DELIMITER";
pub const ENV_DATE: &str = "FAHRPLAN_DATE";
pub const ENV_OUTPUT_DIR: &str = "FAHRPLAN_OUTPUT_DIR";
pub const ENV_BASE_URL: &str = "FAHRPLAN_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "FAHRPLAN_TIMEOUT_SECS";
pub const ENV_LOG_FILE: &str = "FAHRPLAN_LOG_FILE";

/// Configuration errors. These are the only errors that abort a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No API token was configured
    #[error("missing API token: set FAHRPLAN_API_TOKEN")]
    MissingApiToken,

    /// No station list was loaded
    #[error("missing station list: set FAHRPLAN_STATIONS to a file path or URL")]
    MissingStations,

    /// An environment variable could not be interpreted
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Settings for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Bearer token for the Fahrplan API.
    pub api_token: Option<String>,

    /// Path or URL of the station list.
    pub stations_source: Option<String>,

    /// Field delimiter of the station list.
    pub delimiter: u8,

    /// Day to extract.
    pub date: NaiveDate,

    /// Directory the document store writes to.
    pub output_dir: PathBuf,

    /// Fahrplan API base URL.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// File receiving warnings and errors.
    pub log_file: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            stations_source: None,
            delimiter: b';',
            date: NaiveDate::from_ymd_opt(2022, 7, 1).unwrap_or_default(),
            output_dir: PathBuf::from("data"),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            log_file: PathBuf::from("error-log.log"),
        }
    }
}

impl ExtractConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.api_token = get(ENV_API_TOKEN);
        config.stations_source = get(ENV_STATIONS);

        if let Some(value) = get(ENV_DELIMITER) {
            config.delimiter = match value.as_bytes() {
                [b] if b.is_ascii() => *b,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_DELIMITER,
                        value,
                        reason: "must be a single ASCII character",
                    });
                }
            };
        }

        if let Some(value) = get(ENV_DATE) {
            config.date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                ConfigError::Invalid {
                    var: ENV_DATE,
                    value: value.clone(),
                    reason: "expected YYYY-MM-DD",
                }
            })?;
        }

        if let Some(value) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(value);
        }

        if let Some(value) = get(ENV_BASE_URL) {
            config.base_url = value;
        }

        if let Some(value) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = match value.trim().parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_TIMEOUT_SECS,
                        value,
                        reason: "expected a positive number of seconds",
                    });
                }
            };
        }

        if let Some(value) = get(ENV_LOG_FILE) {
            config.log_file = PathBuf::from(value);
        }

        Ok(config)
    }

    /// Fail if the API token or the station list is missing, in that order.
    pub fn check_required(&self) -> Result<(), ConfigError> {
        if self.api_token.is_none() {
            return Err(ConfigError::MissingApiToken);
        }
        if self.stations_source.is_none() {
            return Err(ConfigError::MissingStations);
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn fahrplan_config(&self) -> FahrplanConfig {
        FahrplanConfig {
            api_token: self.api_token.clone(),
            ..FahrplanConfig::default()
        }
        .with_base_url(self.base_url.clone())
        .with_timeout(self.timeout_secs)
    }

    /// Crawl settings derived from this configuration.
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::for_day(self.date)
    }
}
