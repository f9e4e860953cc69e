//! Vector store client for pattern retrieval.
//!
//! Three collections back the retrieval paths: curated test-data patterns,
//! defect-triggering patterns, and anonymized production samples. Search is
//! keyword (BM25) scoring over a pattern's text; no vectorizer is required.
//!
//! The concrete client speaks the Weaviate REST/GraphQL surface. A logical
//! session is opened per retrieval-path RPC: `connect` verifies readiness,
//! `disconnect` closes the session, and both are called on every exit path.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Settings;
use crate::error::Error;

/// Named corpus buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Curated successful test-data patterns.
    Patterns,
    /// Patterns that have triggered defects before.
    Defects,
    /// Anonymized production-like samples.
    Production,
}

impl Collection {
    /// Collection name in the store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Patterns => "TestDataPattern",
            Collection::Defects => "DefectPattern",
            Collection::Production => "ProductionSample",
        }
    }
}

/// Vector store failures.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// The store is unreachable or refused the session.
    #[error("vector store unavailable: {0}")]
    Unavailable(String),
    /// Operation attempted without an open session.
    #[error("vector store session not open")]
    NotConnected,
    /// The store answered but the operation failed.
    #[error("vector store operation failed: {0}")]
    Operation(String),
}

impl From<VectorStoreError> for Error {
    fn from(err: VectorStoreError) -> Self {
        Error::RetrievalUnavailable(err.to_string())
    }
}

/// One retrieved pattern.
#[derive(Debug, Clone)]
pub struct PatternHit {
    /// Store-assigned object id.
    pub id: String,
    /// Object properties.
    pub data: Value,
    /// BM25 relevance score, when reported.
    pub score: Option<f64>,
}

/// Pattern storage and retrieval operations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Open a session; verifies the store is ready.
    async fn connect(&self) -> Result<(), VectorStoreError>;

    /// Close the session. Safe to call on any exit path.
    async fn disconnect(&self);

    /// Top-k keyword search over a collection.
    async fn search(
        &self,
        collection: Collection,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<PatternHit>, VectorStoreError>;

    /// Insert one object; returns its id.
    async fn insert(
        &self,
        collection: Collection,
        data: Value,
    ) -> Result<String, VectorStoreError>;

    /// Insert many objects; returns their ids.
    async fn batch_insert(
        &self,
        collection: Collection,
        data: Vec<Value>,
    ) -> Result<Vec<String>, VectorStoreError>;

    /// Number of objects in a collection.
    async fn count(&self, collection: Collection) -> Result<u64, VectorStoreError>;

    /// Whether the collection exists.
    async fn exists(&self, collection: Collection) -> Result<bool, VectorStoreError>;

    /// Drop a collection and its objects.
    async fn delete_collection(&self, collection: Collection) -> Result<(), VectorStoreError>;
}

/// Weaviate-backed [`VectorStore`] over REST/GraphQL.
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
    connected: std::sync::atomic::AtomicBool,
}

impl WeaviateClient {
    /// Build a client from settings.
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_url(settings.weaviate_url.clone())
    }

    /// Build a client against an explicit URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connected: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn ensure_connected(&self) -> Result<(), VectorStoreError> {
        if self.connected.load(std::sync::atomic::Ordering::Acquire) {
            Ok(())
        } else {
            Err(VectorStoreError::NotConnected)
        }
    }

    async fn graphql(&self, query: String) -> Result<Value, VectorStoreError> {
        let response = self
            .http
            .post(format!("{}/v1/graphql", self.base_url))
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;

        if let Some(errors) = payload.get("errors").filter(|e| !e.is_null()) {
            return Err(VectorStoreError::Operation(errors.to_string()));
        }
        Ok(payload)
    }
}

#[async_trait]
impl VectorStore for WeaviateClient {
    async fn connect(&self) -> Result<(), VectorStoreError> {
        let response = self
            .http
            .get(format!("{}/v1/.well-known/ready", self.base_url))
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VectorStoreError::Unavailable(format!(
                "readiness check returned {}",
                response.status()
            )));
        }

        self.connected
            .store(true, std::sync::atomic::Ordering::Release);
        tracing::info!(url = %self.base_url, "vector_store_connected");
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected
            .store(false, std::sync::atomic::Ordering::Release);
        tracing::info!("vector_store_disconnected");
    }

    async fn search(
        &self,
        collection: Collection,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<PatternHit>, VectorStoreError> {
        self.ensure_connected()?;

        let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
        let gql = format!(
            "{{ Get {{ {}(bm25: {{query: \"{}\"}}, limit: {}) {{ payload _additional {{ id score }} }} }} }}",
            collection.name(),
            escaped,
            top_k
        );

        let payload = self.graphql(gql).await?;
        let objects = payload["data"]["Get"][collection.name()]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let hits = objects
            .into_iter()
            .map(|obj| {
                let additional = &obj["_additional"];
                PatternHit {
                    id: additional["id"].as_str().unwrap_or_default().to_string(),
                    score: additional["score"]
                        .as_str()
                        .and_then(|s| s.parse().ok())
                        .or_else(|| additional["score"].as_f64()),
                    data: obj["payload"]
                        .as_str()
                        .and_then(|s| serde_json::from_str(s).ok())
                        .unwrap_or(obj["payload"].clone()),
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            collection = collection.name(),
            query_length = query.len(),
            results = hits.len(),
            "vector_store_search_complete"
        );
        Ok(hits)
    }

    async fn insert(
        &self,
        collection: Collection,
        data: Value,
    ) -> Result<String, VectorStoreError> {
        self.ensure_connected()?;

        let body = json!({
            "class": collection.name(),
            "properties": { "payload": data.to_string() },
        });

        let response = self
            .http
            .post(format!("{}/v1/objects", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VectorStoreError::Operation(format!(
                "insert returned {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;
        Ok(payload["id"].as_str().unwrap_or_default().to_string())
    }

    async fn batch_insert(
        &self,
        collection: Collection,
        data: Vec<Value>,
    ) -> Result<Vec<String>, VectorStoreError> {
        let mut ids = Vec::with_capacity(data.len());
        for item in data {
            ids.push(self.insert(collection, item).await?);
        }
        tracing::info!(
            collection = collection.name(),
            count = ids.len(),
            "vector_store_batch_insert_complete"
        );
        Ok(ids)
    }

    async fn count(&self, collection: Collection) -> Result<u64, VectorStoreError> {
        self.ensure_connected()?;

        let gql = format!(
            "{{ Aggregate {{ {} {{ meta {{ count }} }} }} }}",
            collection.name()
        );
        let payload = self.graphql(gql).await?;
        Ok(
            payload["data"]["Aggregate"][collection.name()][0]["meta"]["count"]
                .as_u64()
                .unwrap_or(0),
        )
    }

    async fn exists(&self, collection: Collection) -> Result<bool, VectorStoreError> {
        self.ensure_connected()?;

        let response = self
            .http
            .get(format!(
                "{}/v1/schema/{}",
                self.base_url,
                collection.name()
            ))
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        Ok(response.status().is_success())
    }

    async fn delete_collection(&self, collection: Collection) -> Result<(), VectorStoreError> {
        self.ensure_connected()?;

        let response = self
            .http
            .delete(format!(
                "{}/v1/schema/{}",
                self.base_url,
                collection.name()
            ))
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(VectorStoreError::Operation(format!(
                "delete returned {}",
                response.status()
            )));
        }
        tracing::info!(collection = collection.name(), "vector_store_collection_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Patterns.name(), "TestDataPattern");
        assert_eq!(Collection::Defects.name(), "DefectPattern");
        assert_eq!(Collection::Production.name(), "ProductionSample");
    }

    #[tokio::test]
    async fn test_operations_require_connect() {
        let client = WeaviateClient::with_base_url("http://127.0.0.1:1");
        let err = client.search(Collection::Patterns, "q", 5).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::NotConnected));
    }

    #[test]
    fn test_error_maps_to_retrieval_unavailable() {
        let err: Error = VectorStoreError::Unavailable("refused".into()).into();
        assert!(matches!(err, Error::RetrievalUnavailable(_)));
    }
}
