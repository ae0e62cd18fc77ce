//! Domain types for the departure extraction pipeline.
//!
//! These types enforce their invariants at construction time, so the crawl
//! code that receives them can trust their validity.

mod eva;
mod window;

pub use eva::{EvaNumber, InvalidEva};
pub use window::{TimeWindow, TimestampError, format_query_time, parse_departure_time};
