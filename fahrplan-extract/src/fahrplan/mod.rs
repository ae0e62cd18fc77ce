//! Deutsche Bahn Fahrplan API client.
//!
//! Two endpoints are used:
//! - `departureBoard/{eva}?date=...` returns up to a page of departures from
//!   a station starting at the given time. Paging is done by re-querying
//!   with the time of the last departure seen.
//! - `journeyDetails/{id}` returns the stop sequence of one train. The id
//!   comes from a departure record and must be percent-encoded again.

mod client;
mod error;
pub mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, FahrplanClient, FahrplanConfig};
pub use error::FahrplanError;
pub use mock::MockFahrplanClient;
pub use source::DepartureSource;
pub use types::{DepartureRecord, JourneyDetail};
