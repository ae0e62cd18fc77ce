//! Paginated crawl of one station's departure board.
//!
//! The board is paged by time: each request starts at the departure time of
//! the last record seen. A station's crawl ends when
//! - a page is shorter than `full_page` (end of feed; its records still
//!   count),
//! - a record falls outside the window (the rest of that page is dropped),
//! - or anything fails (records accepted before the failure are kept).

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::EvaNumber;
use crate::fahrplan::{DepartureRecord, DepartureSource};
use crate::store::{Collection, DocumentStore};

use super::config::CrawlConfig;
use super::error::CrawlError;
use super::registry::DedupRegistry;

/// What a single page tells the crawler to do next.
#[derive(Debug)]
pub enum PageOutcome {
    /// Page was full and entirely in the window: request the next one.
    MorePages,
    /// Page was short (or empty): this was the last one.
    EndOfFeed,
    /// A record lay outside the window; later records were not examined.
    OutOfWindow,
    /// The request or a record failed.
    Failed(CrawlError),
}

/// Result of crawling one page.
#[derive(Debug)]
pub struct PageStep {
    pub outcome: PageOutcome,
    /// Cursor for the next request.
    pub cursor: NaiveDateTime,
    /// Newly accepted departures, in page order.
    pub accepted: Vec<DepartureRecord>,
    /// Number of records in the response.
    pub received: usize,
    /// Number of records looked at before the page ended.
    pub examined: usize,
}

impl PageStep {
    fn new(cursor: NaiveDateTime) -> Self {
        Self {
            outcome: PageOutcome::EndOfFeed,
            cursor,
            accepted: Vec::new(),
            received: 0,
            examined: 0,
        }
    }

    fn finish(mut self, outcome: PageOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    fn fail(self, err: CrawlError) -> Self {
        self.finish(PageOutcome::Failed(err))
    }
}

/// Why a station's crawl stopped.
#[derive(Debug)]
pub enum CrawlEnd {
    EndOfFeed,
    OutOfWindow,
    Failed(CrawlError),
}

/// Everything one station contributed to the run.
#[derive(Debug)]
pub struct StationCrawl {
    pub station: EvaNumber,
    /// Newly accepted departures, in the order they were seen.
    pub accepted: Vec<DepartureRecord>,
    /// Number of board requests made.
    pub pages: usize,
    pub end: CrawlEnd,
}

impl StationCrawl {
    /// The error that ended this crawl, if any.
    pub fn error(&self) -> Option<&CrawlError> {
        match &self.end {
            CrawlEnd::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }
}

/// Crawls station departure boards against a shared registry.
pub struct StationCrawler<'a, S, D> {
    source: &'a S,
    store: &'a D,
    config: CrawlConfig,
}

impl<'a, S: DepartureSource, D: DocumentStore> StationCrawler<'a, S, D> {
    pub fn new(source: &'a S, store: &'a D, config: CrawlConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Crawl every page of `station` inside the window.
    ///
    /// Never fails: errors end this station's crawl and are returned in
    /// [`StationCrawl::end`] alongside whatever was accepted before them.
    pub async fn crawl(&self, station: &EvaNumber, registry: &mut DedupRegistry) -> StationCrawl {
        let mut cursor = self.config.window.start();
        let mut accepted = Vec::new();
        let mut pages = 0;

        let end = loop {
            let step = self.crawl_page(station, cursor, registry).await;
            pages += 1;
            accepted.extend(step.accepted);

            debug!(
                station = %station,
                page = pages,
                received = step.received,
                examined = step.examined,
                "crawled page"
            );

            match step.outcome {
                PageOutcome::MorePages if step.cursor == cursor => {
                    // Every departure on a full page shared the cursor time.
                    // Asking again would return the same page forever.
                    warn!(
                        station = %station,
                        cursor = %cursor,
                        "cursor did not advance on a full page; ending station"
                    );
                    break CrawlEnd::EndOfFeed;
                }
                PageOutcome::MorePages => cursor = step.cursor,
                PageOutcome::EndOfFeed => break CrawlEnd::EndOfFeed,
                PageOutcome::OutOfWindow => break CrawlEnd::OutOfWindow,
                PageOutcome::Failed(err) => {
                    error!(
                        station = %station,
                        page = pages,
                        hint = err.hint(),
                        "station crawl failed: {err}"
                    );
                    break CrawlEnd::Failed(err);
                }
            }
        };

        StationCrawl {
            station: station.clone(),
            accepted,
            pages,
            end,
        }
    }

    /// Fetch and process the page of `station` starting at `cursor`.
    pub async fn crawl_page(
        &self,
        station: &EvaNumber,
        cursor: NaiveDateTime,
        registry: &mut DedupRegistry,
    ) -> PageStep {
        let step = PageStep::new(cursor);

        let payload = match self.source.departures(station, cursor).await {
            Ok(payload) => payload,
            Err(e) => return step.fail(e.into()),
        };

        let records = match payload {
            Value::Array(records) => records,
            other => return step.fail(CrawlError::MalformedPayload(json_kind(&other))),
        };

        self.process_page(records, registry, step)
    }

    fn process_page(
        &self,
        records: Vec<Value>,
        registry: &mut DedupRegistry,
        mut step: PageStep,
    ) -> PageStep {
        step.received = records.len();
        let last_page = records.len() < self.config.full_page;

        for (index, value) in records.into_iter().enumerate() {
            step.examined += 1;

            let record = match DepartureRecord::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    return step.fail(CrawlError::MalformedRecord {
                        index,
                        message: e.to_string(),
                    });
                }
            };

            let departs = match record.departure_time() {
                Ok(t) => t,
                Err(source) => return step.fail(CrawlError::Timestamp { index, source }),
            };

            if !self.config.window.contains(departs) {
                return step.finish(PageOutcome::OutOfWindow);
            }

            step.cursor = departs;

            if registry.contains(&record.name) {
                continue;
            }

            if let Err(e) = self.accept(&record, registry) {
                return step.fail(e);
            }
            step.accepted.push(record);
        }

        let outcome = if last_page {
            PageOutcome::EndOfFeed
        } else {
            PageOutcome::MorePages
        };
        step.finish(outcome)
    }

    /// Persist `record` and claim its name.
    fn accept(
        &self,
        record: &DepartureRecord,
        registry: &mut DedupRegistry,
    ) -> Result<(), CrawlError> {
        let document = record.to_document()?;
        self.store.insert_one(Collection::Train, &document)?;
        registry.insert(record.name.clone());
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
