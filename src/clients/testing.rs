//! In-crate test doubles for the backend clients.
//!
//! `ScriptedModel` replays canned text-model responses; `MemoryVectorStore`
//! keeps collections in memory and records session activity so tests can
//! assert connect/disconnect pairing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::llm::{ModelResponse, TextModel, TextModelError};
use crate::clients::vector::{Collection, PatternHit, VectorStore, VectorStoreError};

/// Scripted text-model double. Pops one response per call; errors are
/// replayed in order too.
pub struct ScriptedModel {
    provider: &'static str,
    responses: Mutex<Vec<Result<String, TextModelError>>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    /// Model that answers each call with the next scripted string.
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            provider: "mock",
            responses: Mutex::new(
                responses
                    .into_iter()
                    .rev()
                    .map(|r| Ok(r.to_string()))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    /// Model that replays the given results (ok or error) in order.
    pub fn scripted(responses: Vec<Result<String, TextModelError>>) -> Self {
        Self {
            provider: "mock",
            responses: Mutex::new(responses.into_iter().rev().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Rename the provider reported in metadata.
    pub fn named(mut self, provider: &'static str) -> Self {
        self.provider = provider;
        self
    }

    /// Calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    fn provider(&self) -> &str {
        self.provider
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<ModelResponse, TextModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TextModelError::Other("script exhausted".to_string())));
        next.map(|content| ModelResponse {
            content,
            tokens_used: 42,
        })
    }
}

/// In-memory vector store double.
pub struct MemoryVectorStore {
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    connected: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    fail_connect: bool,
}

impl MemoryVectorStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            fail_connect: false,
        }
    }

    /// Store whose `connect` always fails, for unavailability tests.
    pub fn unavailable() -> Self {
        Self {
            fail_connect: true,
            ..Self::new()
        }
    }

    /// Pre-seed a collection without needing a session.
    pub fn seed(&self, collection: Collection, patterns: Vec<Value>) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.name())
            .or_default()
            .extend(patterns);
    }

    /// Sessions opened and closed so far.
    pub fn session_counts(&self) -> (usize, usize) {
        (
            self.connects.load(Ordering::SeqCst),
            self.disconnects.load(Ordering::SeqCst),
        )
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn connect(&self) -> Result<(), VectorStoreError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(VectorStoreError::Unavailable(
                "scripted connection failure".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn search(
        &self,
        collection: Collection,
        _query: &str,
        top_k: usize,
    ) -> Result<Vec<PatternHit>, VectorStoreError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(VectorStoreError::NotConnected);
        }
        let collections = self.collections.lock().unwrap();
        let patterns = collections.get(collection.name()).cloned().unwrap_or_default();
        Ok(patterns
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(i, data)| PatternHit {
                id: format!("mem-{i}"),
                data,
                score: Some(1.0 - i as f64 * 0.1),
            })
            .collect())
    }

    async fn insert(
        &self,
        collection: Collection,
        data: Value,
    ) -> Result<String, VectorStoreError> {
        let mut collections = self.collections.lock().unwrap();
        let bucket = collections.entry(collection.name()).or_default();
        bucket.push(data);
        Ok(format!("mem-{}", bucket.len() - 1))
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
        Ok(ids)
    }

    async fn count(&self, collection: Collection) -> Result<u64, VectorStoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection.name())
            .map(|b| b.len() as u64)
            .unwrap_or(0))
    }

    async fn exists(&self, collection: Collection) -> Result<bool, VectorStoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections.contains_key(collection.name()))
    }

    async fn delete_collection(&self, collection: Collection) -> Result<(), VectorStoreError> {
        self.collections.lock().unwrap().remove(collection.name());
        Ok(())
    }
}
