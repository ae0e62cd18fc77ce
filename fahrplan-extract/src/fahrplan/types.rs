//! Fahrplan API response DTOs.
//!
//! Departure records are persisted verbatim, so only the fields the crawl
//! needs are named here. Everything else rides along in `extra`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{TimestampError, parse_departure_time};

/// One entry of a `departureBoard` response.
///
/// ```json
/// {
///   "name": "ICE 1091",
///   "type": "ICE",
///   "boardId": 8000105,
///   "stopId": 8000105,
///   "stopName": "Frankfurt(Main)Hbf",
///   "dateTime": "2022-07-01T00:14",
///   "track": "7",
///   "detailsId": "305679%2F105073%2F..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    /// Train name, e.g. "ICE 1091". Deduplication key for the whole run.
    pub name: String,

    /// Scheduled departure as local wall-clock time.
    pub date_time: String,

    /// Opaque token for the `journeyDetails` endpoint.
    pub details_id: String,

    /// Remaining fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DepartureRecord {
    /// Decode one element of a departure board page.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Parse the scheduled departure time.
    pub fn departure_time(&self) -> Result<NaiveDateTime, TimestampError> {
        parse_departure_time(&self.date_time)
    }

    /// The document written to the `train` collection.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A train's full stop sequence, as written to the `stops` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyDetail {
    /// Train name the detail was requested for.
    pub name: String,

    /// Raw `journeyDetails` payload.
    pub stop: Value,
}

impl JourneyDetail {
    pub fn new(name: impl Into<String>, stop: Value) -> Self {
        Self {
            name: name.into(),
            stop,
        }
    }

    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
