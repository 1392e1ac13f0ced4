//! Storage abstractions for service layer
//!
//! Content lives in named collections of schemaless documents. The
//! `DocumentStore` trait is the seam; `FileDocumentStore` keeps each
//! collection in a JSON file, `FirestoreStore` talks to the hosted
//! document database over REST.

pub mod document;
pub mod file_store;
pub mod firestore;
pub mod json_map_store;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{StoreBackend, StoreConfig};
use thiserror::Error;
use tracing::info;

pub use document::{Direction, Document, FieldFilter, OrderBy, Query};
pub use file_store::FileDocumentStore;
pub use firestore::FirestoreStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot serve this filter/order combination without a
    /// composite index.
    #[error("missing index: {0}")]
    IndexMissing(String),
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Document database access used by the content, settings and admin services.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Every document of the collection, in no particular order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Equality filters plus ordering. Backends may refuse combinations that
    /// need an index with `StoreError::IndexMissing`.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Write a document. With `merge` only the given top-level fields are
    /// replaced; otherwise the stored document is overwritten.
    async fn set(&self, collection: &str, doc: Document, merge: bool) -> Result<(), StoreError>;

    /// Remove a document; returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Build the configured backend.
pub fn open_store(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match cfg.backend {
        StoreBackend::File => {
            let indexes = cfg.parse_indexes()?;
            info!(data_dir = %cfg.data_dir, indexes = indexes.len(), "using file document store");
            Ok(Arc::new(FileDocumentStore::new(&cfg.data_dir, indexes)))
        }
        StoreBackend::Firestore => {
            let store = FirestoreStore::new(&cfg.firestore)?;
            info!(project = %cfg.firestore.project_id, "using firestore document store");
            Ok(Arc::new(store))
        }
    }
}
