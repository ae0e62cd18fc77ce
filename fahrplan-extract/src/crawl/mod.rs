//! Departure extraction: station crawl, deduplication and journey details.
//!
//! The [`Extractor`] owns a [`DedupRegistry`] for the whole run and lends it
//! to a [`StationCrawler`] for each station in turn. Accepted departures are
//! then handed to the [`JourneyDetailFetcher`] one by one. Failures are
//! values in the [`ExtractionReport`], never early returns.

mod config;
mod error;
mod extractor;
mod journey;
mod registry;
mod station;


pub use config::{CrawlConfig, DEFAULT_FULL_PAGE};
pub use error::CrawlError;
pub use extractor::{ExtractionReport, Extractor};
pub use journey::{DetailFailure, DetailOutcome, JourneyDetailFetcher};
pub use registry::DedupRegistry;
pub use station::{CrawlEnd, PageOutcome, PageStep, StationCrawl, StationCrawler};
