//! The generator pipeline.
//!
//! Four backends produce records: deterministic synthetic generation, a
//! language model, pattern retrieval, and a hybrid of the last two. All
//! implement [`Generator`]; the orchestrator picks one per request via the
//! router and handles fallback between them.

pub mod hybrid;
pub mod llm;
pub mod retrieval;
pub mod synthetic;

pub use hybrid::HybridGenerator;
pub use llm::LlmGenerator;
pub use retrieval::RetrievalGenerator;
pub use synthetic::SyntheticGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::request::GenerateRequest;
use crate::schema::Schema;

/// A generated record: an ordered field map.
pub type Record = Map<String, Value>;

/// Per-invocation context handed to a generator.
#[derive(Clone, Default)]
pub struct GenerationContext {
    /// Resolved schema, when one was found.
    pub schema: Option<Arc<Schema>>,
    /// Retrieval examples injected by the hybrid path.
    pub retrieval_examples: Option<Vec<Value>>,
}

/// Output of one generator invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerationResult {
    /// Records in generation order.
    pub data: Vec<Record>,
    /// Generation metadata (`generation_path`, timings, token counts, ...).
    pub metadata: Map<String, Value>,
}

impl GenerationResult {
    /// Split into fixed-size batches for streaming, preserving order.
    ///
    /// Each batch carries the source metadata plus `batch_index` and
    /// `batch_size`.
    pub fn into_batches(self, batch_size: usize) -> Vec<GenerationResult> {
        let batch_size = batch_size.max(1);
        let metadata = self.metadata;
        let mut batches = Vec::new();

        let mut data = self.data;
        let mut batch_index = 0u64;
        while !data.is_empty() {
            let rest = data.split_off(batch_size.min(data.len()));
            let mut batch_meta = metadata.clone();
            batch_meta.insert("batch_index".to_string(), batch_index.into());
            batch_meta.insert("batch_size".to_string(), data.len().into());
            batches.push(GenerationResult {
                data,
                metadata: batch_meta,
            });
            data = rest;
            batch_index += 1;
        }

        batches
    }
}

/// A generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Path name reported in metadata (`synthetic`, `llm`, ...).
    fn path(&self) -> &'static str;

    /// Produce records for the request.
    async fn generate(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult>;

    /// Whether this backend is a sensible choice for the request.
    fn supports(&self, request: &GenerateRequest) -> bool;
}

/// Stamp `_index` (0-based, unique) and default `_scenario` onto records.
pub fn stamp_metadata_fields(records: &mut [Record]) {
    for (idx, record) in records.iter_mut().enumerate() {
        record.insert("_index".to_string(), idx.into());
        if !record.contains_key("_scenario") {
            record.insert("_scenario".to_string(), "default".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                json!({"n": i})
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    #[test]
    fn test_stamp_assigns_unique_indexes() {
        let mut data = records(5);
        stamp_metadata_fields(&mut data);
        for (i, record) in data.iter().enumerate() {
            assert_eq!(record["_index"], json!(i));
            assert_eq!(record["_scenario"], json!("default"));
        }
    }

    #[test]
    fn test_stamp_preserves_existing_scenario() {
        let mut data = records(1);
        data[0].insert("_scenario".to_string(), json!("edge_case"));
        stamp_metadata_fields(&mut data);
        assert_eq!(data[0]["_scenario"], json!("edge_case"));
    }

    #[test]
    fn test_batches_preserve_order_and_counts() {
        let result = GenerationResult {
            data: records(12),
            metadata: Map::new(),
        };
        let batches = result.into_batches(5);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].data.len(), 5);
        assert_eq!(batches[1].data.len(), 5);
        assert_eq!(batches[2].data.len(), 2);

        assert_eq!(batches[0].metadata["batch_index"], json!(0));
        assert_eq!(batches[2].metadata["batch_index"], json!(2));
        assert_eq!(batches[2].metadata["batch_size"], json!(2));

        // Records flow through in generation order.
        let flattened: Vec<i64> = batches
            .iter()
            .flat_map(|b| b.data.iter().map(|r| r["n"].as_i64().unwrap()))
            .collect();
        assert_eq!(flattened, (0..12).collect::<Vec<i64>>());
    }

    #[test]
    fn test_empty_result_yields_no_batches() {
        let result = GenerationResult::default();
        assert!(result.into_batches(10).is_empty());
    }
}
