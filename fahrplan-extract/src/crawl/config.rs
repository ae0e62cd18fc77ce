//! Crawl configuration.

use chrono::NaiveDate;

use crate::domain::TimeWindow;

/// Pages shorter than this are the end of a station's feed.
pub const DEFAULT_FULL_PAGE: usize = 20;

/// Configuration parameters for a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Departures outside this window end a station's crawl.
    pub window: TimeWindow,

    /// Minimum length of a page that may be followed by another.
    pub full_page: usize,
}

impl CrawlConfig {
    /// Create a configuration with an explicit window and page threshold.
    pub fn new(window: TimeWindow, full_page: usize) -> Self {
        Self { window, full_page }
    }

    /// Crawl one calendar day with the default page threshold.
    pub fn for_day(day: NaiveDate) -> Self {
        Self::new(TimeWindow::for_day(day), DEFAULT_FULL_PAGE)
    }
}
