//! Mock Fahrplan client for testing without API access.
//!
//! Serves scripted departure boards and journey details as if they were
//! live API responses, and records every request it sees.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::{EvaNumber, format_query_time};

use super::error::FahrplanError;
use super::source::DepartureSource;

/// A request the mock has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    Departures { station: EvaNumber, at: NaiveDateTime },
    JourneyDetails { details_id: String },
}

/// Scripted reply for one request.
#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
}

impl Reply {
    fn into_result(self) -> Result<Value, FahrplanError> {
        match self {
            Reply::Json(value) => Ok(value),
            Reply::Status(status) => Err(FahrplanError::Api {
                status,
                message: format!("scripted status {status}"),
            }),
        }
    }
}

/// Mock client that serves scripted responses.
///
/// Departure boards are keyed by `(station, cursor)`, so a test scripts
/// exactly the pages it expects the crawler to ask for. Unscripted requests
/// fail with a 404 naming what was asked for.
#[derive(Clone, Default)]
pub struct MockFahrplanClient {
    credentials: bool,
    boards: HashMap<(EvaNumber, NaiveDateTime), Reply>,
    details: HashMap<String, Reply>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockFahrplanClient {
    /// A mock that behaves as if an API token were configured.
    pub fn new() -> Self {
        Self {
            credentials: true,
            ..Self::default()
        }
    }

    /// A mock with no API token.
    pub fn without_credentials() -> Self {
        Self::default()
    }

    /// Serve `page` for the board of `station` at `at`.
    pub fn with_board(mut self, station: &EvaNumber, at: NaiveDateTime, page: Value) -> Self {
        self.boards
            .insert((station.clone(), at), Reply::Json(page));
        self
    }

    /// Fail the board request for `station` at `at` with `status`.
    pub fn with_board_status(mut self, station: &EvaNumber, at: NaiveDateTime, status: u16) -> Self {
        self.boards
            .insert((station.clone(), at), Reply::Status(status));
        self
    }

    /// Serve `detail` for `details_id`.
    pub fn with_details(mut self, details_id: impl Into<String>, detail: Value) -> Self {
        self.details.insert(details_id.into(), Reply::Json(detail));
        self
    }

    /// Fail the details request for `details_id` with `status`.
    pub fn with_details_status(mut self, details_id: impl Into<String>, status: u16) -> Self {
        self.details.insert(details_id.into(), Reply::Status(status));
        self
    }

    /// Every request answered so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Board requests made for `station`, in order.
    pub fn board_requests(&self, station: &EvaNumber) -> Vec<NaiveDateTime> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                MockRequest::Departures { station: s, at } if &s == station => Some(at),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: MockRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}

impl DepartureSource for MockFahrplanClient {
    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn departures(
        &self,
        station: &EvaNumber,
        at: NaiveDateTime,
    ) -> Result<Value, FahrplanError> {
        self.record(MockRequest::Departures {
            station: station.clone(),
            at,
        });

        match self.boards.get(&(station.clone(), at)) {
            Some(reply) => reply.clone().into_result(),
            None => Err(FahrplanError::Api {
                status: 404,
                message: format!(
                    "No mock board for station {} at {}",
                    station,
                    format_query_time(at)
                ),
            }),
        }
    }

    async fn journey_details(&self, details_id: &str) -> Result<Value, FahrplanError> {
        self.record(MockRequest::JourneyDetails {
            details_id: details_id.to_string(),
        });

        match self.details.get(details_id) {
            Some(reply) => reply.clone().into_result(),
            None => Err(FahrplanError::Api {
                status: 404,
                message: format!("No mock journey details for {details_id}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn serves_scripted_board() {
        let eva = EvaNumber::parse("8000105").unwrap();
        let mock = MockFahrplanClient::new().with_board(&eva, at(0, 0), json!([]));

        assert_eq!(mock.departures(&eva, at(0, 0)).await.unwrap(), json!([]));
        assert_eq!(mock.board_requests(&eva), vec![at(0, 0)]);
    }

    #[tokio::test]
    async fn unscripted_board_is_not_found() {
        let eva = EvaNumber::parse("8000105").unwrap();
        let mock = MockFahrplanClient::new();

        let err = mock.departures(&eva, at(9, 30)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("2022-07-01T09:30:00"));
    }

    #[tokio::test]
    async fn scripted_status_is_returned() {
        let mock = MockFahrplanClient::new().with_details_status("abc", 429);

        let err = mock.journey_details("abc").await.unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(
            mock.requests(),
            vec![MockRequest::JourneyDetails {
                details_id: "abc".to_string()
            }]
        );
    }

    #[test]
    fn credentials_flag() {
        assert!(MockFahrplanClient::new().has_credentials());
        assert!(!MockFahrplanClient::without_credentials().has_credentials());
    }
}
