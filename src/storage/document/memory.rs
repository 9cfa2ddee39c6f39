use super::ordering::compare_values;
use super::{Document, DocumentStore, Fields, OrderBy, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

/// In-process document store.
///
/// Used as the test double for the facade and for local runs without a
/// remote backend. Writes are serialized by the lock (last write wins).
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
    simulate_failure: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`,
    /// standing in for an unreachable remote store.
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, AtomicOrdering::SeqCst);
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.simulate_failure.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable(
                "simulated store failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn query_ordered(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|c| {
                c.values()
                    .filter(|d| d.fields.contains_key(&order_by.field))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|a, b| {
            compare_values(&a.fields[&order_by.field], &b.fields[&order_by.field])
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(docs)
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.get(key)).cloned())
    }

    async fn set(&self, collection: &str, key: &str, fields: &Fields) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(
            key.to_string(),
            Document {
                key: key.to_string(),
                fields: fields.clone(),
                update_time: Some(Utc::now()),
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: &Fields,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(key))
            .ok_or_else(|| StoreError::not_found(collection, key))?;
        for (field, value) in fields {
            doc.fields.insert(field.clone(), value.clone());
        }
        doc.update_time = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        if let Some(c) = collections.get_mut(collection) {
            c.remove(key);
        }
        Ok(())
    }

    async fn ping(&self, _collection: &str) -> Result<(), StoreError> {
        self.check_available()
    }
}
