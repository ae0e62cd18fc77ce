//! Document persistence for stations, trains and stops.
//!
//! The crawl only ever inserts; it never reads back, updates or deletes
//! individual documents. Deduplication happens in memory before anything
//! reaches the store.

mod error;
mod jsonl;
mod memory;

use std::fmt;

use serde_json::Value;

pub use error::StoreError;
pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;

/// The three logical collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Station reference list, unfiltered.
    Station,
    /// One document per accepted departure.
    Train,
    /// One document per fetched journey detail.
    Stops,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Station, Collection::Train, Collection::Stops];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Station => "station",
            Collection::Train => "train",
            Collection::Stops => "stops",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Insert-only document store.
pub trait DocumentStore {
    /// Remove every document from `collection`.
    fn clear(&self, collection: Collection) -> Result<(), StoreError>;

    /// Append one document.
    fn insert_one(&self, collection: Collection, document: &Value) -> Result<(), StoreError>;

    /// Append many documents, in order.
    fn insert_many(&self, collection: Collection, documents: &[Value]) -> Result<(), StoreError> {
        for document in documents {
            self.insert_one(collection, document)?;
        }
        Ok(())
    }

    /// Empty all collections, so a rerun does not duplicate earlier output.
    fn clear_all(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            self.clear(collection)?;
        }
        Ok(())
    }
}
