//! Extraction orchestrator.
//!
//! Crawls every configured station in order, then fetches the journey detail
//! of every train accepted along the way. Work is strictly sequential: one
//! request is in flight at a time.

use tracing::{info, warn};

use crate::config::ConfigError;
use crate::fahrplan::{DepartureRecord, DepartureSource};
use crate::stations::{Station, long_distance};
use crate::store::{Collection, DocumentStore, StoreError};

use super::config::CrawlConfig;
use super::journey::{DetailFailure, DetailOutcome, JourneyDetailFetcher};
use super::registry::DedupRegistry;
use super::station::{StationCrawl, StationCrawler};

/// Log detail progress every this many trains.
const DETAIL_PROGRESS_EVERY: usize = 100;

/// Result of a full extraction run.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// One entry per station, in crawl order.
    pub stations: Vec<StationCrawl>,
    /// One entry per accepted train, in accumulation order.
    pub details: Vec<DetailOutcome>,
}

impl ExtractionReport {
    /// Every accepted departure, in accumulation order.
    pub fn accepted(&self) -> impl Iterator<Item = &DepartureRecord> {
        self.stations.iter().flat_map(|s| s.accepted.iter())
    }

    pub fn trains_accepted(&self) -> usize {
        self.stations.iter().map(|s| s.accepted.len()).sum()
    }

    pub fn failed_stations(&self) -> impl Iterator<Item = &StationCrawl> {
        self.stations.iter().filter(|s| s.is_failed())
    }

    pub fn details_stored(&self) -> usize {
        self.details.iter().filter(|d| d.is_ok()).count()
    }

    pub fn failed_details(&self) -> impl Iterator<Item = &DetailFailure> {
        self.details.iter().filter_map(|d| d.as_ref().err())
    }
}

/// Drives a whole extraction run.
pub struct Extractor<S, D> {
    source: S,
    store: D,
    config: CrawlConfig,
    stations: Option<Vec<Station>>,
    registry: DedupRegistry,
}

impl<S: DepartureSource, D: DocumentStore> Extractor<S, D> {
    pub fn new(source: S, store: D, config: CrawlConfig) -> Self {
        Self {
            source,
            store,
            config,
            stations: None,
            registry: DedupRegistry::new(),
        }
    }

    /// Persist the full reference list and keep its long-distance stations
    /// for crawling.
    ///
    /// Returns the number of stations that will be crawled.
    pub fn load_stations(&mut self, stations: Vec<Station>) -> Result<usize, StoreError> {
        let documents: Vec<_> = stations.iter().map(Station::to_document).collect();
        self.store.insert_many(Collection::Station, &documents)?;

        let crawl_list = long_distance(&stations);
        info!(
            total = stations.len(),
            long_distance = crawl_list.len(),
            "stations loaded"
        );

        let count = crawl_list.len();
        self.stations = Some(crawl_list);
        Ok(count)
    }

    /// Stations that will be crawled, if loaded.
    pub fn stations(&self) -> Option<&[Station]> {
        self.stations.as_deref()
    }

    /// Train names accepted so far.
    pub fn registry(&self) -> &DedupRegistry {
        &self.registry
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Check the preconditions of [`run`](Self::run) without doing any work.
    pub fn check_ready(&self) -> Result<(), ConfigError> {
        if !self.source.has_credentials() {
            return Err(ConfigError::MissingApiToken);
        }
        if self.stations.is_none() {
            return Err(ConfigError::MissingStations);
        }
        Ok(())
    }

    /// Crawl every station, then fetch every accepted train's journey.
    ///
    /// Only a missing precondition fails the run; per-station and per-train
    /// failures are collected in the report.
    pub async fn run(&mut self) -> Result<ExtractionReport, ConfigError> {
        self.check_ready()?;
        let stations = self.stations.as_deref().unwrap_or_default();

        let crawler = StationCrawler::new(&self.source, &self.store, self.config);
        let mut report = ExtractionReport::default();

        let total = stations.len();
        for (i, station) in stations.iter().enumerate() {
            info!(station = %station.eva, "station {}/{}", i + 1, total);

            let crawl = crawler.crawl(&station.eva, &mut self.registry).await;
            info!(
                station = %station.eva,
                accepted = crawl.accepted.len(),
                pages = crawl.pages,
                "station done"
            );
            report.stations.push(crawl);
        }

        let fetcher = JourneyDetailFetcher::new(&self.source, &self.store);
        let trains: Vec<(String, String)> = report
            .accepted()
            .map(|r| (r.details_id.clone(), r.name.clone()))
            .collect();

        let total = trains.len();
        info!(trains = total, "fetching journey details");
        for (i, (details_id, name)) in trains.iter().enumerate() {
            report.details.push(fetcher.fetch(details_id, name).await);

            if (i + 1) % DETAIL_PROGRESS_EVERY == 0 {
                info!("journey details {}/{}", i + 1, total);
            }
        }

        let failed_stations = report.failed_stations().count();
        let failed_details = report.failed_details().count();
        if failed_stations > 0 || failed_details > 0 {
            warn!(failed_stations, failed_details, "extraction finished with failures");
        }
        info!(
            stations = report.stations.len(),
            trains = report.trains_accepted(),
            details = report.details_stored(),
            "extraction finished"
        );

        Ok(report)
    }
}
