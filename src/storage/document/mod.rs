//! Document-store boundary.
//!
//! The material facade only needs a handful of primitives from the remote
//! store: an ordered scan of a collection, point reads, full-replace writes,
//! partial merges and deletes. `DocumentStore` captures exactly that so the
//! backend (Firestore, Postgres, in-memory) is chosen at startup and injected.

use crate::infra::config::StoreBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::sync::Arc;

pub mod error;
pub mod firestore;
pub mod memory;
pub mod ordering;
pub mod postgres;

pub use error::StoreError;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use postgres::PostgresDocumentStore;

/// Top-level fields of a document.
pub type Fields = JsonMap<String, JsonValue>;

/// A stored document: its key within the collection plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Fields,
    pub update_time: Option<DateTime<Utc>>,
}

/// Ascending sort on one top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
}

impl OrderBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// Minimal CRUD contract of a schemaless document store.
///
/// Writes are last-write-wins per document; no implementation offers
/// transactions across documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Every document of `collection` that has `order_by.field`, sorted by it.
    /// Ties are broken by document key (byte order).
    async fn query_ordered(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Creates or fully replaces the document at `key`.
    async fn set(&self, collection: &str, key: &str, fields: &Fields) -> Result<(), StoreError>;

    /// Merges top-level `fields` into an existing document.
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn update(&self, collection: &str, key: &str, fields: &Fields)
        -> Result<(), StoreError>;

    /// Removes the document at `key`. Removing an absent document succeeds.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Cheap round-trip proving the store is reachable for `collection`.
    async fn ping(&self, collection: &str) -> Result<(), StoreError>;
}

/// Builds the configured backend.
pub async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match backend {
        StoreBackend::Firestore(config) => Ok(Arc::new(FirestoreStore::new(config)?)),
        StoreBackend::Postgres { database_url } => {
            Ok(Arc::new(PostgresDocumentStore::connect(database_url).await?))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
