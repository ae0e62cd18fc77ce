//! Departure extraction for the Deutsche Bahn Fahrplan API.
//!
//! Crawls one day of departures from every long-distance station, keeps the
//! first departure seen for each train name, then fetches and stores each
//! kept train's stop sequence.

pub mod config;
pub mod crawl;
pub mod domain;
pub mod error;
pub mod fahrplan;
pub mod stations;
pub mod store;
pub mod telemetry;
