//! Record stores backing the search engine
//!
//! A store hands out whole collections by record type. Stores are read-only
//! and the engine reloads what it needs on every query.

use crate::record::{Record, RecordType};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A loaded collection, in source order
pub type Collection = Vec<Record>;

/// Source of record collections
pub trait RecordStore {
    /// Load every record of the given type
    fn load(&self, record_type: RecordType) -> Result<Collection, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self, record_type: RecordType) -> Result<Collection, StoreError> {
        (**self).load(record_type)
    }
}

/// Store reading `<data_dir>/<type>.json`, one JSON array per collection
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the collection files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing a collection
    pub fn collection_path(&self, record_type: RecordType) -> PathBuf {
        self.data_dir.join(format!("{}.json", record_type.as_str()))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, record_type: RecordType) -> Result<Collection, StoreError> {
        let path = self.collection_path(record_type);

        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::CollectionNotFound(record_type)
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let records: Collection =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;

        debug!(
            collection = %record_type,
            path = %path.display(),
            records = records.len(),
            "Loaded collection"
        );

        Ok(records)
    }
}

/// In-memory store, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<RecordType, Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection for a record type
    pub fn insert(&mut self, record_type: RecordType, records: Collection) {
        self.collections.insert(record_type, records);
    }

    /// Builder-style variant of [`MemoryStore::insert`]
    pub fn with(mut self, record_type: RecordType, records: Collection) -> Self {
        self.insert(record_type, records);
        self
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, record_type: RecordType) -> Result<Collection, StoreError> {
        self.collections
            .get(&record_type)
            .cloned()
            .ok_or(StoreError::CollectionNotFound(record_type))
    }
}

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(RecordType),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed collection file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
