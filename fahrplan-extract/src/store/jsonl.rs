//! JSON Lines document store.
//!
//! Each collection is a `<name>.jsonl` file in one directory, one document
//! per line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::StoreError;
use super::{Collection, DocumentStore};

/// Document store backed by one JSON Lines file per collection.
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    dir: PathBuf,
}

impl JsonLinesStore {
    /// Open a store rooted at `dir`.
    ///
    /// Creates the directory if it doesn't exist. Existing files are kept;
    /// call [`DocumentStore::clear_all`] to start from scratch.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();

        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        }

        Ok(Self { dir })
    }

    /// Path of the file backing `collection`.
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.jsonl", collection.name()))
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl DocumentStore for JsonLinesStore {
    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let path = self.path(collection);
        std::fs::write(&path, b"").map_err(|e| io_error(&path, e))
    }

    fn insert_one(&self, collection: Collection, document: &Value) -> Result<(), StoreError> {
        self.insert_many(collection, std::slice::from_ref(document))
    }

    fn insert_many(&self, collection: Collection, documents: &[Value]) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        for document in documents {
            serde_json::to_writer(&mut buf, document)?;
            buf.push(b'\n');
        }

        let path = self.path(collection);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;

        file.write_all(&buf).map_err(|e| io_error(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn insert_appends_lines() {
        let dir = tempdir().unwrap();
        let store = JsonLinesStore::open(dir.path()).unwrap();

        store.insert_one(Collection::Train, &json!({"name": "ICE 1"})).unwrap();
        store
            .insert_many(
                Collection::Train,
                &[json!({"name": "ICE 2"}), json!({"name": "IC 3"})],
            )
            .unwrap();

        let lines = read_lines(&store.path(Collection::Train));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], json!({"name": "IC 3"}));
    }

    #[test]
    fn clear_all_truncates_every_collection() {
        let dir = tempdir().unwrap();
        let store = JsonLinesStore::open(dir.path()).unwrap();
        store.insert_one(Collection::Stops, &json!({"x": 1})).unwrap();

        store.clear_all().unwrap();

        for collection in Collection::ALL {
            let path = store.path(collection);
            assert!(path.exists());
            assert!(read_lines(&path).is_empty());
        }
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("2022-07-01");
        let store = JsonLinesStore::open(&nested).unwrap();

        store.insert_one(Collection::Station, &json!({})).unwrap();
        assert!(nested.join("station.jsonl").exists());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn io_error_names_path() {
        let dir = tempdir().unwrap();
        let store = JsonLinesStore::open(dir.path()).unwrap();
        // A directory where the file should be makes the open fail
        std::fs::create_dir(store.path(Collection::Train)).unwrap();

        let err = store.insert_one(Collection::Train, &json!({})).unwrap_err();
        assert!(err.to_string().contains("train.jsonl"));
    }
}
