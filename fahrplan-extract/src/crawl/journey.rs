//! Per-train journey detail fetching.

use tracing::error;

use crate::fahrplan::{DepartureSource, JourneyDetail};
use crate::store::{Collection, DocumentStore};

use super::error::CrawlError;

/// A train whose journey detail could not be stored.
#[derive(Debug)]
pub struct DetailFailure {
    pub train: String,
    pub details_id: String,
    pub error: CrawlError,
}

/// Outcome of one journey detail fetch; `Ok` carries the train name.
pub type DetailOutcome = Result<String, DetailFailure>;

/// Fetches journey details and writes them to the `stops` collection.
pub struct JourneyDetailFetcher<'a, S, D> {
    source: &'a S,
    store: &'a D,
}

impl<'a, S: DepartureSource, D: DocumentStore> JourneyDetailFetcher<'a, S, D> {
    pub fn new(source: &'a S, store: &'a D) -> Self {
        Self { source, store }
    }

    /// Fetch and store the stop sequence of `train`.
    ///
    /// Failures are logged and returned, never propagated: one missing
    /// detail must not hold up the trains after it.
    pub async fn fetch(&self, details_id: &str, train: &str) -> DetailOutcome {
        match self.fetch_inner(details_id, train).await {
            Ok(()) => Ok(train.to_string()),
            Err(err) => {
                error!(
                    train,
                    details_id,
                    hint = err.hint(),
                    "journey detail failed: {err}"
                );
                Err(DetailFailure {
                    train: train.to_string(),
                    details_id: details_id.to_string(),
                    error: err,
                })
            }
        }
    }

    async fn fetch_inner(&self, details_id: &str, train: &str) -> Result<(), CrawlError> {
        let stop = self.source.journey_details(details_id).await?;
        let detail = JourneyDetail::new(train, stop);
        self.store
            .insert_one(Collection::Stops, &detail.to_document()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fahrplan::MockFahrplanClient;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn stores_wrapped_detail() {
        let source = MockFahrplanClient::new().with_details("abc", json!([{"stopName": "Fulda"}]));
        let store = MemoryStore::new();
        let fetcher = JourneyDetailFetcher::new(&source, &store);

        let outcome = fetcher.fetch("abc", "ICE 100").await;

        assert_eq!(outcome.unwrap(), "ICE 100");
        assert_eq!(
            store.documents(Collection::Stops),
            vec![json!({"name": "ICE 100", "stop": [{"stopName": "Fulda"}]})]
        );
    }

    #[tokio::test]
    async fn failure_is_returned_not_raised() {
        let source = MockFahrplanClient::new().with_details_status("abc", 500);
        let store = MemoryStore::new();
        let fetcher = JourneyDetailFetcher::new(&source, &store);

        let failure = fetcher.fetch("abc", "ICE 100").await.unwrap_err();

        assert_eq!(failure.train, "ICE 100");
        assert_eq!(failure.details_id, "abc");
        assert!(matches!(failure.error, CrawlError::Fetch(_)));
        assert_eq!(store.count(Collection::Stops), 0);
    }
}
