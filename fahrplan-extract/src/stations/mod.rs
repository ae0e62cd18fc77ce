//! Station reference list.
//!
//! Stations come from Deutsche Bahn's delimited station export (one row per
//! station, `EVA_NR` and `Verkehr` among the columns). Only long-distance
//! stations are crawled, but the full list is kept for persistence.

mod error;
mod loader;

pub use error::StationError;
pub use loader::{
    EVA_COLUMN, LONG_DISTANCE, Station, TRAFFIC_COLUMN, load_stations, long_distance,
    parse_stations,
};
