//! HTTP client wrapper for the vector store (Qdrant REST API).

use crate::store::payload::{build_record_payload, record_id_for};
use crate::store::types::{
    QueryPoint, QueryResponse, QueryResponseResult, ScoredRecord, StoreError, UpsertOutcome,
};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;

/// Lightweight HTTP client for embedding-record operations.
///
/// Safe to share across sessions: every write is a single point upsert with
/// `wait=true`, so concurrent calls for different document identifiers never
/// corrupt each other and a record is never half-written.
pub struct VectorStoreService {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl VectorStoreService {
    /// Construct a new client for the given store endpoint.
    pub fn new(
        url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent("legalens/0.1")
            .timeout(timeout)
            .build()?;
        let base_url = normalize_base_url(url).map_err(StoreError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = api_key.as_deref().map(|v| !v.is_empty()).unwrap_or(false),
            "Initialized vector store HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Create the named collection only when it is missing from the store.
    pub async fn ensure_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> Result<(), StoreError> {
        if self.collection_exists(collection).await? {
            return Ok(());
        }

        tracing::debug!(collection, vector_size, "Creating collection");
        let body = json!({
            "vectors": {
                "size": vector_size,
                "distance": "Cosine"
            }
        });

        let response = self
            .request(Method::PUT, &format!("collections/{collection}"))
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(collection, "Collection ensured/created");
        })
        .await
    }

    /// Store an embedding record for a document, skipping when one exists.
    ///
    /// The record identifier derives deterministically from `document_id`, so
    /// a second call for the same document is a no-op rather than an update.
    pub async fn upsert_record(
        &self,
        collection: &str,
        document_id: &str,
        text: &str,
        vector: Vec<f32>,
    ) -> Result<UpsertOutcome, StoreError> {
        let record_id = record_id_for(document_id);
        if self.record_exists(collection, &record_id).await? {
            tracing::debug!(collection, document_id, "Record already stored; skipping");
            return Ok(UpsertOutcome::Skipped);
        }

        let payload = build_record_payload(document_id, text);
        let body = json!({
            "points": [{
                "id": record_id,
                "vector": vector,
                "payload": payload,
            }]
        });

        let response = self
            .request(Method::PUT, &format!("collections/{collection}/points"))
            .query(&[("wait", true)])
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(collection, document_id, "Record stored");
        })
        .await?;

        Ok(UpsertOutcome::Inserted)
    }

    /// Perform a similarity query, returning the `limit` closest records.
    ///
    /// A missing collection or an empty store yields an empty result rather
    /// than an error.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let body = json!({
            "query": vector,
            "limit": limit,
            "with_payload": true,
        });

        let response = self
            .request(Method::POST, &format!("collections/{collection}/points/query"))
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(collection, "Collection absent; returning empty result");
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(collection, error = %error, "Vector store search failed");
            return Err(error);
        }

        let payload: QueryResponse = response.json().await?;
        let points = match payload.result {
            QueryResponseResult::Points(points) => points,
            QueryResponseResult::Object { points } => points,
        };

        Ok(points.into_iter().map(map_query_point).collect())
    }

    /// Whether a record with the given identifier is present.
    pub async fn record_exists(
        &self,
        collection: &str,
        record_id: &str,
    ) -> Result<bool, StoreError> {
        let response = self
            .request(
                Method::GET,
                &format!("collections/{collection}/points/{record_id}"),
            )
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                let error = StoreError::UnexpectedStatus { status, body };
                tracing::error!(collection, record_id, error = %error, "Record existence check failed");
                Err(error)
            }
        }
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool, StoreError> {
        let response = self
            .request(Method::GET, &format!("collections/{collection}"))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                let error = StoreError::UnexpectedStatus { status, body };
                tracing::error!(collection, error = %error, "Collection existence check failed");
                Err(error)
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }
        req
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Vector store request failed");
            Err(error)
        }
    }
}

fn map_query_point(point: QueryPoint) -> ScoredRecord {
    let payload = point.payload.unwrap_or_default();
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    ScoredRecord {
        id: stringify_point_id(point.id),
        score: point.score,
        document_id: field("document_id"),
        text: field("text"),
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn stringify_point_id(id: Value) -> String {
    match id {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
