//! Document-store abstraction.
//!
//! A [`Collection`] holds JSON-serializable documents keyed by id. Backends
//! implement the same five operations; handlers never see the backend type.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// A type that can live in a named collection.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection this type is stored in.
    const COLLECTION: &'static str;

    /// Storage key of this document.
    fn doc_id(&self) -> Uuid;
}

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Operations every backend supports.
///
/// `put_many` replaces each named document as one batch; the batch either
/// lands whole or not at all. Within a collection the last write wins.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError>;

    /// All documents, ordered by id.
    async fn list(&self) -> Result<Vec<T>, StoreError>;

    async fn upsert(&self, doc: &T) -> Result<(), StoreError>;

    async fn put_many(&self, docs: &[T]) -> Result<(), StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
