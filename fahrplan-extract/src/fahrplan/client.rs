//! Fahrplan HTTP client.
//!
//! Provides async methods for querying the Deutsche Bahn Fahrplan API.
//! Every request carries a bearer token and asks for JSON. There is no
//! retry: a failed request is reported to the caller as-is.

use chrono::NaiveDateTime;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::domain::{EvaNumber, format_query_time};

use super::error::FahrplanError;
use super::source::DepartureSource;

/// Default base URL for the Fahrplan API.
pub const DEFAULT_BASE_URL: &str = "https://api.deutschebahn.com/fahrplan-plus/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an undecodable body to keep in the error.
const ERROR_BODY_LIMIT: usize = 500;

/// Characters left untouched when encoding a details id: unreserved
/// characters plus `/`.
const DETAILS_ID: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Configuration for the Fahrplan client.
#[derive(Debug, Clone)]
pub struct FahrplanConfig {
    /// Bearer token; requests fail with `NotConfigured` until one is set
    pub api_token: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FahrplanConfig {
    /// Create a new config with the given API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            ..Self::default()
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FahrplanConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Fahrplan API client.
#[derive(Debug, Clone)]
pub struct FahrplanClient {
    http: reqwest::Client,
    base_url: String,
    authorization: Option<HeaderValue>,
}

impl FahrplanClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FahrplanConfig) -> Result<Self, FahrplanError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut client = Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: None,
        };

        if let Some(token) = config.api_token {
            client.set_api_token(&token)?;
        }

        Ok(client)
    }

    /// Store the bearer token used for every subsequent request.
    ///
    /// An empty token clears it.
    pub fn set_api_token(&mut self, token: &str) -> Result<(), FahrplanError> {
        let token = token.trim();
        if token.is_empty() {
            self.authorization = None;
            return Ok(());
        }

        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            FahrplanError::NotConfigured("API token contains invalid characters".to_string())
        })?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(())
    }

    /// URL of the departure board for `station` starting at `at`.
    pub fn departure_board_url(&self, station: &EvaNumber, at: NaiveDateTime) -> String {
        format!(
            "{}/departureBoard/{}?date={}",
            self.base_url,
            station.as_str(),
            format_query_time(at)
        )
    }

    /// URL of the journey details for `details_id`.
    pub fn journey_details_url(&self, details_id: &str) -> String {
        format!(
            "{}/journeyDetails/{}",
            self.base_url,
            utf8_percent_encode(details_id, DETAILS_ID)
        )
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Anything other than `200 OK` is an error carrying the status and the
    /// response body.
    pub async fn get_json(&self, url: &str) -> Result<Value, FahrplanError> {
        let authorization = self
            .authorization
            .clone()
            .ok_or_else(|| FahrplanError::NotConfigured("missing API token".to_string()))?;

        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FahrplanError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FahrplanError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_LIMIT).collect()),
        })
    }
}

impl DepartureSource for FahrplanClient {
    fn has_credentials(&self) -> bool {
        self.authorization.is_some()
    }

    async fn departures(
        &self,
        station: &EvaNumber,
        at: NaiveDateTime,
    ) -> Result<Value, FahrplanError> {
        let url = self.departure_board_url(station, at);
        self.get_json(&url).await
    }

    async fn journey_details(&self, details_id: &str) -> Result<Value, FahrplanError> {
        let url = self.journey_details_url(details_id);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn client() -> FahrplanClient {
        FahrplanClient::new(FahrplanConfig::new("test-token").with_base_url("http://localhost:8080/"))
            .unwrap()
    }

    #[test]
    fn config_builder() {
        let config = FahrplanConfig::new("test-token")
            .with_base_url("http://localhost:8080")
            .with_timeout(60);

        assert_eq!(config.api_token.as_deref(), Some("test-token"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = FahrplanConfig::default();

        assert_eq!(config.api_token, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn credentials_follow_token() {
        let mut client = FahrplanClient::new(FahrplanConfig::default()).unwrap();
        assert!(!client.has_credentials());

        client.set_api_token("abc").unwrap();
        assert!(client.has_credentials());

        client.set_api_token("  ").unwrap();
        assert!(!client.has_credentials());
    }

    #[test]
    fn rejects_token_with_newline() {
        let mut client = FahrplanClient::new(FahrplanConfig::default()).unwrap();
        assert!(client.set_api_token("abc\ndef").is_err());
        assert!(!client.has_credentials());
    }

    #[test]
    fn departure_board_url_format() {
        let at = NaiveDate::from_ymd_opt(2022, 7, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let eva = EvaNumber::parse("8000105").unwrap();

        assert_eq!(
            client().departure_board_url(&eva, at),
            "http://localhost:8080/departureBoard/8000105?date=2022-07-01T08:15:00"
        );
    }

    #[test]
    fn journey_details_id_is_encoded() {
        let client = client();

        assert_eq!(
            client.journey_details_url("305679%2F105073%2F0"),
            "http://localhost:8080/journeyDetails/305679%252F105073%252F0"
        );
        assert_eq!(
            client.journey_details_url("a b/c?d"),
            "http://localhost:8080/journeyDetails/a%20b/c%3Fd"
        );
        assert_eq!(
            client.journey_details_url("AZ-az_09.~"),
            "http://localhost:8080/journeyDetails/AZ-az_09.~"
        );
    }

    #[tokio::test]
    async fn request_without_token_is_not_configured() {
        let client = FahrplanClient::new(FahrplanConfig::default()).unwrap();
        let err = client.journey_details("x").await.unwrap_err();
        assert!(matches!(err, FahrplanError::NotConfigured(_)));
    }

    // Requests against the live API need a real token and are not run here.
}
