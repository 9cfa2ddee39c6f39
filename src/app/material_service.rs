//! The material data-access facade.
//!
//! Wraps an injected `DocumentStore` and exposes list/get/create/update/delete
//! over the `materiales` collection. Every failure is logged and returned as a
//! `RepositoryError`; nothing is swallowed.

use crate::app::error::RepositoryError;
use crate::domain::material::{
    MaterialDraft, MaterialId, MaterialPatch, MaterialRecord, ID_FIELD,
};
use crate::storage::document::{DocumentStore, OrderBy, StoreError};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Collection holding the material documents.
pub const MATERIALS_COLLECTION: &str = "materiales";

pub struct MaterialService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl MaterialService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, MATERIALS_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    fn store_failure(&self, operation: &'static str, key: &str, err: StoreError) -> RepositoryError {
        match err {
            StoreError::NotFound { .. } => {
                warn!(operation, collection = %self.collection, key, "material not found");
                RepositoryError::NotFound(key.to_string())
            }
            other => {
                error!(
                    operation,
                    collection = %self.collection,
                    key,
                    error = %other,
                    "document store call failed"
                );
                RepositoryError::Transport(other)
            }
        }
    }

    /// All materials, ascending by their stored `id`.
    pub async fn list(&self) -> Result<Vec<MaterialRecord>, RepositoryError> {
        let docs = self
            .store
            .query_ordered(&self.collection, &OrderBy::ascending(ID_FIELD))
            .await
            .map_err(|e| self.store_failure("list", "*", e))?;
        debug!(collection = %self.collection, count = docs.len(), "listed materials");
        Ok(docs
            .into_iter()
            .map(|doc| MaterialRecord::from_document(doc.key, doc.fields))
            .collect())
    }

    pub async fn get(&self, id: &MaterialId) -> Result<MaterialRecord, RepositoryError> {
        let doc = self
            .store
            .get(&self.collection, id.as_str())
            .await
            .map_err(|e| self.store_failure("get", id.as_str(), e))?;
        match doc {
            Some(doc) => Ok(MaterialRecord::from_document(doc.key, doc.fields)),
            None => Err(self.store_failure(
                "get",
                id.as_str(),
                StoreError::not_found(&self.collection, id.as_str()),
            )),
        }
    }

    /// Writes `record` at key `string(record.id)`, replacing any existing document.
    pub async fn create(&self, record: &JsonValue) -> Result<MaterialRecord, RepositoryError> {
        let draft = MaterialDraft::from_json(record).map_err(|e| {
            warn!(operation = "create", error = %e, "rejected material");
            RepositoryError::from(e)
        })?;
        self.store
            .set(&self.collection, draft.id.as_str(), &draft.body)
            .await
            .map_err(|e| self.store_failure("create", draft.id.as_str(), e))?;
        info!(collection = %self.collection, key = %draft.id, "material written");
        Ok(draft.to_record())
    }

    /// Merges the top-level fields of `patch` into an existing material.
    pub async fn update(
        &self,
        id: &MaterialId,
        patch: &JsonValue,
    ) -> Result<(), RepositoryError> {
        let patch = MaterialPatch::from_json(id, patch).map_err(|e| {
            warn!(operation = "update", key = %id, error = %e, "rejected material patch");
            RepositoryError::from(e)
        })?;
        self.store
            .update(&self.collection, id.as_str(), &patch.fields)
            .await
            .map_err(|e| self.store_failure("update", id.as_str(), e))?;
        info!(collection = %self.collection, key = %id, fields = patch.fields.len(), "material updated");
        Ok(())
    }

    /// Removes a material. Deleting an absent id succeeds.
    pub async fn delete(&self, id: &MaterialId) -> Result<(), RepositoryError> {
        self.store
            .delete(&self.collection, id.as_str())
            .await
            .map_err(|e| self.store_failure("delete", id.as_str(), e))?;
        info!(collection = %self.collection, key = %id, "material deleted");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.store
            .ping(&self.collection)
            .await
            .map_err(|e| self.store_failure("ping", "-", e))
    }
}
