//! Hybrid generation: retrieval feeding the language model.
//!
//! Retrieves patterns for the request, injects them into the generation
//! context as examples, and lets the LLM produce the final records. When
//! retrieval comes back empty the LLM runs alone and the degradation is
//! logged.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::generate::{GenerationContext, GenerationResult, Generator};
use crate::generate::{LlmGenerator, RetrievalGenerator};
use crate::request::GenerateRequest;

/// Composes [`RetrievalGenerator`] and [`LlmGenerator`].
pub struct HybridGenerator {
    retrieval: Arc<RetrievalGenerator>,
    llm: Arc<LlmGenerator>,
}

impl HybridGenerator {
    /// New hybrid over the two backends.
    pub fn new(retrieval: Arc<RetrievalGenerator>, llm: Arc<LlmGenerator>) -> Self {
        Self { retrieval, llm }
    }
}

#[async_trait]
impl Generator for HybridGenerator {
    fn path(&self) -> &'static str {
        "hybrid"
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        let start = Instant::now();

        tracing::info!(
            request_id = %request.request_id,
            count = request.count,
            entity = %request.entity,
            "hybrid_generate_start"
        );

        let retrieval_result = self.retrieval.generate(request, ctx).await?;
        let examples: Vec<Value> = retrieval_result
            .data
            .iter()
            .cloned()
            .map(Value::Object)
            .collect();

        if examples.is_empty() {
            tracing::warn!(
                request_id = %request.request_id,
                falling_back = "llm_only",
                "hybrid_no_retrieval_examples"
            );
        } else {
            tracing::info!(
                request_id = %request.request_id,
                examples_retrieved = examples.len(),
                "hybrid_retrieval_complete"
            );
        }

        let mut enhanced = ctx.clone();
        let examples_used = examples.len();
        enhanced.retrieval_examples = Some(examples);

        let llm_result = self.llm.generate(request, &enhanced).await?;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            request_id = %request.request_id,
            records = llm_result.data.len(),
            retrieval_examples_used = examples_used,
            "hybrid_generate_success"
        );

        let mut metadata = llm_result.metadata;
        metadata.insert("generation_path".to_string(), "hybrid".into());
        metadata.insert(
            "retrieval_examples_used".to_string(),
            examples_used.into(),
        );
        if let Some(collection) = retrieval_result.metadata.get("rag_collection") {
            metadata.insert("rag_collection".to_string(), collection.clone());
        }
        metadata.insert("generation_time_ms".to_string(), duration_ms.into());

        Ok(GenerationResult {
            data: llm_result.data,
            metadata,
        })
    }

    fn supports(&self, request: &GenerateRequest) -> bool {
        let needs_retrieval = self.retrieval.supports(request);
        let needs_llm = self.llm.supports(request);
        let complex_scenarios = request.scenarios.len() > 2;

        (needs_retrieval && needs_llm) || (complex_scenarios && needs_retrieval)
    }
}
