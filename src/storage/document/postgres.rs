//! Document store backed by a single JSONB table in PostgreSQL.

use super::{Document, DocumentStore, Fields, OrderBy, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;

/// A collection-keyed document table shared by every collection.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                doc_key TEXT NOT NULL,
                fields JSONB NOT NULL,
                update_time TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, doc_key)
            )",
        )
        .execute(&pool)
        .await?;
        info!("postgres document store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Removes every document of `collection`.
    pub async fn clear_collection(&self, collection: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn row_to_document(row: PgRow) -> Result<Document, StoreError> {
    let key: String = row.try_get("doc_key")?;
    let fields: JsonValue = row.try_get("fields")?;
    let update_time: DateTime<Utc> = row.try_get("update_time")?;
    match fields {
        JsonValue::Object(fields) => Ok(Document {
            key,
            fields,
            update_time: Some(update_time),
        }),
        other => Err(StoreError::Decode(format!(
            "document {} holds a non-object value: {}",
            key, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn query_ordered(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Document>, StoreError> {
        // Same order as `ordering::compare_values`: type rank first, numbers by
        // value, strings by byte order whatever the database collation is.
        let sql = "SELECT doc_key, fields, update_time FROM documents \
             WHERE collection = $1 AND jsonb_exists(fields, $2::text) \
             ORDER BY \
               CASE jsonb_typeof(fields -> $2::text) \
                 WHEN 'null' THEN 0 WHEN 'boolean' THEN 1 WHEN 'number' THEN 2 \
                 WHEN 'string' THEN 3 WHEN 'array' THEN 4 ELSE 5 END, \
               CASE WHEN jsonb_typeof(fields -> $2::text) = 'number' \
                 THEN (fields ->> $2::text)::numeric END, \
               (CASE WHEN jsonb_typeof(fields -> $2::text) = 'string' \
                 THEN fields ->> $2::text END) COLLATE \"C\", \
               fields -> $2::text, \
               doc_key COLLATE \"C\"";
        let rows = sqlx::query(sql)
            .bind(collection)
            .bind(&order_by.field)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_document).collect()
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT doc_key, fields, update_time FROM documents WHERE collection = $1 AND doc_key = $2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_document).transpose()
    }

    async fn set(&self, collection: &str, key: &str, fields: &Fields) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO documents (collection, doc_key, fields, update_time) VALUES ($1, $2, $3, now())
             ON CONFLICT (collection, doc_key) DO UPDATE SET fields = EXCLUDED.fields, update_time = now()",
        )
        .bind(collection)
        .bind(key)
        .bind(JsonValue::Object(fields.clone()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: &Fields,
    ) -> Result<(), StoreError> {
        // `||` on jsonb objects is a shallow merge: top-level keys of the right side win.
        let result = sqlx::query(
            "UPDATE documents SET fields = fields || $3::jsonb, update_time = now()
             WHERE collection = $1 AND doc_key = $2",
        )
        .bind(collection)
        .bind(key)
        .bind(JsonValue::Object(fields.clone()))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, key));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND doc_key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self, _collection: &str) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
