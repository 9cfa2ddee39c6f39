//! Cloud Firestore backend over the REST v1 API.
//!
//! Only the calls the material facade needs are implemented: document
//! get/patch/delete and `runQuery` with a single `orderBy`. Requests are
//! authorized with the project's web API key, so access is governed by the
//! database's security rules.

use super::{Document, DocumentStore, Fields, OrderBy, StoreError};
use crate::infra::config::FirebaseConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::debug;

pub mod value;

use value::{decode_fields, encode_fields, quote_field_path};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: JsonMap<String, JsonValue>,
    #[serde(default)]
    update_time: Option<String>,
}

#[derive(Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<RawDocument>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, StoreError> {
        let key = self
            .name
            .rsplit('/')
            .next()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StoreError::Decode(format!("bad document name: {}", self.name)))?
            .to_string();
        let fields = decode_fields(&self.fields)?;
        let update_time = self
            .update_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        Ok(Document {
            key,
            fields,
            update_time,
        })
    }
}

/// Firestore client bound to one project/database.
pub struct FirestoreStore {
    http: reqwest::Client,
    documents_url: Url,
    api_key: String,
}

impl FirestoreStore {
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let documents_url = Url::parse(&format!(
            "{}/v1/projects/{}/databases/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.project_id,
            config.database_id
        ))
        .map_err(|e| StoreError::Transport(format!("invalid Firestore endpoint: {}", e)))?;

        Ok(Self {
            http,
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    fn document_url(&self, collection: &str, key: &str) -> Result<Url, StoreError> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport("Firestore endpoint cannot be a base".to_string()))?
            .push(collection)
            .push(key);
        Ok(url)
    }

    fn run_query_url(&self) -> Result<Url, StoreError> {
        Url::parse(&format!("{}:runQuery", self.documents_url))
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    /// Sends the request with the API key and maps non-2xx answers to errors.
    ///
    /// `document` names the target of point operations; only those turn a
    /// 404 into `StoreError::NotFound`. For queries a 404 means the project
    /// or database is wrong and is reported as `Rejected`.
    async fn send(
        &self,
        request: RequestBuilder,
        document: Option<(&str, &str)>,
    ) -> Result<Response, StoreError> {
        let response = request.query(&[("key", &self.api_key)]).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let (message, code) = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => (envelope.error.message, envelope.error.status),
            Err(_) => (status.to_string(), String::new()),
        };
        debug!(%status, code = %code, message = %message, "firestore request failed");
        if let Some((collection, key)) = document {
            if status == StatusCode::NOT_FOUND || code == "NOT_FOUND" {
                return Err(StoreError::not_found(collection, key));
            }
        }
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn run_query(&self, structured_query: JsonValue) -> Result<Vec<Document>, StoreError> {
        let request = self
            .http
            .post(self.run_query_url()?)
            .json(&json!({ "structuredQuery": structured_query }));
        let items: Vec<RunQueryItem> = self.send(request, None).await?.json().await?;
        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(RawDocument::into_document)
            .collect()
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    async fn query_ordered(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Document>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "orderBy": [{
                "field": { "fieldPath": quote_field_path(&order_by.field) },
                "direction": "ASCENDING"
            }]
        }))
        .await
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let request = self.http.get(self.document_url(collection, key)?);
        match self.send(request, Some((collection, key))).await {
            Ok(response) => {
                let raw: RawDocument = response.json().await?;
                raw.into_document().map(Some)
            }
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(&self, collection: &str, key: &str, fields: &Fields) -> Result<(), StoreError> {
        // PATCH without an update mask replaces the whole document (or creates it).
        let request = self
            .http
            .patch(self.document_url(collection, key)?)
            .json(&json!({ "fields": encode_fields(fields) }));
        self.send(request, Some((collection, key))).await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: &Fields,
    ) -> Result<(), StoreError> {
        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|f| ("updateMask.fieldPaths", quote_field_path(f)))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let request = self
            .http
            .patch(self.document_url(collection, key)?)
            .query(&params)
            .json(&json!({ "fields": encode_fields(fields) }));
        self.send(request, Some((collection, key))).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let request = self.http.delete(self.document_url(collection, key)?);
        match self.send(request, Some((collection, key))).await {
            Ok(_) | Err(StoreError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn ping(&self, collection: &str) -> Result<(), StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "limit": 1
        }))
        .await
        .map(|_| ())
    }
}
