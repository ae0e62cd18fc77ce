//! Abstraction over the two upstream endpoints.

use std::future::Future;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::EvaNumber;

use super::error::FahrplanError;

/// Trait for providing departure boards and journey details.
///
/// This abstraction allows the crawl to be tested with scripted responses.
/// Both methods return the decoded JSON body untouched; interpreting it is
/// the crawler's job.
pub trait DepartureSource {
    /// Whether an API token is available for requests.
    fn has_credentials(&self) -> bool;

    /// Departure board for `station`, starting at `at`.
    fn departures(
        &self,
        station: &EvaNumber,
        at: NaiveDateTime,
    ) -> impl Future<Output = Result<Value, FahrplanError>> + Send;

    /// Full stop sequence for the train identified by `details_id`.
    ///
    /// `details_id` is passed exactly as it appeared in the departure record;
    /// implementations are responsible for encoding it.
    fn journey_details(
        &self,
        details_id: &str,
    ) -> impl Future<Output = Result<Value, FahrplanError>> + Send;
}
