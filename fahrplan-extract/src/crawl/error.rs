//! Errors local to one station crawl or one journey detail.
//!
//! None of these abort the run. They end the unit of work they occurred in
//! and are reported in the extraction report.

use crate::domain::TimestampError;
use crate::fahrplan::FahrplanError;
use crate::store::StoreError;

/// Failure of a single station page or journey detail request.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Request to the API failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FahrplanError),

    /// Departure board was not a JSON array
    #[error("malformed payload: expected an array of departures, got {0}")]
    MalformedPayload(&'static str),

    /// A departure could not be decoded
    #[error("malformed departure at index {index}: {message}")]
    MalformedRecord { index: usize, message: String },

    /// A departure's `dateTime` could not be parsed
    #[error("departure at index {index}: {source}")]
    Timestamp {
        index: usize,
        #[source]
        source: TimestampError,
    },

    /// Writing a document failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for CrawlError {
    fn from(err: serde_json::Error) -> Self {
        CrawlError::Store(StoreError::Serialize(err))
    }
}

impl CrawlError {
    /// Likely cause of a rejected request, logged next to the error.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CrawlError::Fetch(e) if e.is_unauthorized() => {
                Some("API token rejected; check FAHRPLAN_API_TOKEN")
            }
            CrawlError::Fetch(e) if e.is_rate_limited() => Some("API quota exhausted"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> CrawlError {
        CrawlError::Fetch(FahrplanError::Api {
            status,
            message: String::new(),
        })
    }

    #[test]
    fn hints_for_rejected_requests() {
        assert!(api(401).hint().unwrap().contains("token"));
        assert!(api(403).hint().unwrap().contains("token"));
        assert_eq!(api(429).hint(), Some("API quota exhausted"));
        assert_eq!(api(500).hint(), None);
        assert_eq!(CrawlError::MalformedPayload("object").hint(), None);
    }

    #[test]
    fn error_display() {
        let err = CrawlError::MalformedPayload("object");
        assert_eq!(
            err.to_string(),
            "malformed payload: expected an array of departures, got object"
        );

        let err = CrawlError::MalformedRecord {
            index: 3,
            message: "missing field `name`".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed departure at index 3: missing field `name`"
        );

        let err = CrawlError::Fetch(FahrplanError::Api {
            status: 429,
            message: "quota".into(),
        });
        assert_eq!(err.to_string(), "fetch failed: API error 429: quota");
    }
}
