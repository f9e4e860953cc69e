//! Request orchestration.
//!
//! Drives a request end to end: route, resolve the schema, invoke the
//! chosen generator (opening the retrieval session when needed), apply the
//! fallback ladder, score coherence, and emit metrics. Both RPC surfaces
//! call into this type; it owns no per-request state beyond the invocation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::clients::cache::CacheClient;
use crate::clients::llm::{AnthropicClient, OpenAiCompatClient, TextModel};
use crate::clients::vector::{VectorStore, WeaviateClient};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::generate::{
    GenerationContext, GenerationResult, Generator, HybridGenerator, LlmGenerator,
    RetrievalGenerator, SyntheticGenerator,
};
use crate::request::GenerateRequest;
use crate::router::{IntelligenceRouter, Path, RoutingDecision};
use crate::schema::{Schema, SchemaInfo, SchemaRegistry};
use crate::telemetry::Metrics;
use crate::validate::CoherenceScorer;

/// Response metadata surfaced to callers.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ResponseMetadata {
    /// Backend that produced the records.
    pub generation_path: String,
    /// Model tokens consumed, when the LLM was involved.
    pub llm_tokens_used: u64,
    /// Wall-clock generation time.
    pub generation_time_ms: f64,
    /// Mean coherence score across returned records.
    pub coherence_score: f64,
    /// Records per scenario in the output.
    pub scenario_counts: BTreeMap<String, i64>,
}

/// Outcome of a unary generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateOutcome {
    /// Echoed correlation id.
    pub request_id: String,
    /// Whether generation succeeded.
    pub success: bool,
    /// Records as a JSON array (empty string on failure).
    pub data: String,
    /// Number of returned records.
    pub record_count: i64,
    /// Error description when `success` is false.
    pub error: Option<String>,
    /// Generation metadata.
    pub metadata: ResponseMetadata,
}

/// One streamed chunk.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    /// Echoed correlation id.
    pub request_id: String,
    /// JSON array of one batch; empty on the terminal chunk, an error
    /// object on failure.
    pub data: String,
    /// Monotonically increasing chunk number.
    pub chunk_index: i64,
    /// Set on exactly the last chunk.
    pub is_final: bool,
}

/// The orchestrator: all collaborators, injected.
pub struct Orchestrator {
    settings: Settings,
    registry: Arc<SchemaRegistry>,
    router: IntelligenceRouter,
    scorer: CoherenceScorer,
    metrics: Arc<Metrics>,
    cache: Arc<CacheClient>,
    vector_store: Arc<dyn VectorStore>,
    synthetic: SyntheticGenerator,
    llm: Arc<LlmGenerator>,
    retrieval: Arc<RetrievalGenerator>,
    hybrid: HybridGenerator,
}

impl Orchestrator {
    /// Wire up the production collaborators from settings.
    pub fn new(settings: Settings) -> Self {
        let primary: Arc<dyn TextModel> = Arc::new(AnthropicClient::new(&settings));
        let secondary: Option<Arc<dyn TextModel>> = if settings.use_local_llm {
            Some(Arc::new(OpenAiCompatClient::new(&settings)))
        } else {
            None
        };
        let vector_store: Arc<dyn VectorStore> = Arc::new(WeaviateClient::new(&settings));
        let cache = Arc::new(CacheClient::new(&settings));

        Self::with_backends(settings, primary, secondary, vector_store, cache)
    }

    /// Wire up with explicit backends; the constructor tests use.
    pub fn with_backends(
        settings: Settings,
        primary: Arc<dyn TextModel>,
        secondary: Option<Arc<dyn TextModel>>,
        vector_store: Arc<dyn VectorStore>,
        cache: Arc<CacheClient>,
    ) -> Self {
        let registry = Arc::new(SchemaRegistry::new());
        let llm = Arc::new(LlmGenerator::new(primary, secondary));
        let retrieval = Arc::new(RetrievalGenerator::new(
            vector_store.clone(),
            settings.rag_top_k,
        ));
        let hybrid = HybridGenerator::new(retrieval.clone(), llm.clone());
        let synthetic = SyntheticGenerator::new(registry.clone());

        tracing::info!(
            grpc_port = settings.grpc_port,
            http_port = settings.http_port,
            "orchestrator_initialized"
        );

        Self {
            settings,
            registry,
            router: IntelligenceRouter,
            scorer: CoherenceScorer,
            metrics: Arc::new(Metrics::new()),
            cache,
            vector_store,
            synthetic,
            llm,
            retrieval,
            hybrid,
        }
    }

    /// Settings the orchestrator was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared metrics handle.
    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Shared cache handle.
    pub fn cache(&self) -> Arc<CacheClient> {
        self.cache.clone()
    }

    /// Schema registry.
    pub fn registry(&self) -> Arc<SchemaRegistry> {
        self.registry.clone()
    }

    /// List schema info, optionally filtered by domain.
    pub fn list_schemas(&self, domain: Option<&str>) -> Vec<SchemaInfo> {
        self.registry
            .list(domain)
            .iter()
            .map(|s| s.info())
            .collect()
    }

    /// Per-component health for the health RPC.
    pub async fn health_components(&self) -> BTreeMap<String, String> {
        let mut components = BTreeMap::new();
        components.insert("grpc_server".to_string(), "healthy".to_string());
        components.insert("config".to_string(), "healthy".to_string());
        components.insert(
            "cache".to_string(),
            if self.cache.is_enabled().await {
                "healthy".to_string()
            } else {
                "disabled".to_string()
            },
        );
        components
    }

    /// Unary generation.
    pub async fn generate(&self, request: GenerateRequest) -> GenerateOutcome {
        tracing::info!(
            request_id = %request.request_id,
            domain = %request.domain,
            entity = %request.entity,
            count = request.count,
            "generate_data_request"
        );

        match self.generate_inner(&request, true).await {
            Ok((result, decision)) => self.finish_success(&request, result, &decision),
            Err(err) => self.finish_error(&request, err),
        }
    }

    /// Streaming generation: batches as chunks, then a terminal chunk.
    ///
    /// Mid-stream failures emit a final chunk carrying a JSON error object.
    pub fn generate_stream(self: Arc<Self>, request: GenerateRequest) -> ReceiverStream<StreamChunk> {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let span = tracing::info_span!("generate_data_stream", request_id = %request.request_id);

        let task = async move {
            tracing::info!(
                request_id = %request.request_id,
                domain = %request.domain,
                entity = %request.entity,
                count = request.count,
                "generate_data_stream_request"
            );

            let request_id = request.request_id.clone();
            match self.generate_inner(&request, false).await {
                Ok((result, decision)) => {
                    let total_records = result.data.len();
                    let batches = result.into_batches(self.settings.default_batch_size);
                    let mut chunk_index: i64 = 0;

                    for batch in batches {
                        let data = serde_json::to_string(&batch.data).unwrap_or_default();
                        let chunk = StreamChunk {
                            request_id: request_id.clone(),
                            data,
                            chunk_index,
                            is_final: false,
                        };
                        if tx.send(chunk).await.is_err() {
                            // Caller cancelled; emitted chunks stay delivered.
                            tracing::info!(request_id = %request_id, "generate_data_stream_cancelled");
                            return;
                        }
                        chunk_index += 1;
                    }

                    let _ = tx
                        .send(StreamChunk {
                            request_id: request_id.clone(),
                            data: String::new(),
                            chunk_index,
                            is_final: true,
                        })
                        .await;

                    self.metrics.record_request(
                        decision.path.as_str(),
                        &request.domain,
                        &request.entity,
                        "success",
                        0.0,
                    );
                    tracing::info!(
                        request_id = %request_id,
                        total_chunks = chunk_index + 1,
                        total_records,
                        "generate_data_stream_complete"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        request_id = %request_id,
                        error = %err,
                        "generate_data_stream_error"
                    );
                    let payload = serde_json::json!({"error": err.to_string()}).to_string();
                    let _ = tx
                        .send(StreamChunk {
                            request_id,
                            data: payload,
                            chunk_index: 0,
                            is_final: true,
                        })
                        .await;
                }
            }
        };
        tokio::spawn(task.instrument(span));

        ReceiverStream::new(rx)
    }

    async fn generate_inner(
        &self,
        request: &GenerateRequest,
        enforce_sync_limit: bool,
    ) -> Result<(GenerationResult, RoutingDecision)> {
        if request.count <= 0 {
            return Err(Error::InvalidRequest(format!(
                "count must be positive, got {}",
                request.count
            )));
        }
        if enforce_sync_limit && request.count > self.settings.max_sync_records {
            return Err(Error::LimitExceeded {
                requested: request.count,
                limit: self.settings.max_sync_records,
            });
        }

        let decision = self.router.route(request);
        tracing::info!(
            request_id = %request.request_id,
            path = decision.path.as_str(),
            reason = %decision.reason,
            confidence = decision.confidence,
            "routing_decision"
        );

        let ctx = GenerationContext {
            schema: self.resolve_schema(request)?,
            retrieval_examples: None,
        };

        let result = self.dispatch(request, &ctx, decision.path).await?;

        // Soft conformance check: violations are logged and counted, never
        // fatal -- the caller still gets the records.
        if let Some(schema) = &ctx.schema {
            let violations: usize = result
                .data
                .iter()
                .map(|record| {
                    crate::validate::validate_record(record, schema, &request.constraints).len()
                })
                .sum();
            if violations > 0 {
                tracing::warn!(
                    request_id = %request.request_id,
                    error_count = violations,
                    "validation_failed"
                );
                self.metrics
                    .record_validation_error(&request.domain, &request.entity);
            }
        }

        Ok((result, decision))
    }

    /// Resolve the request's schema: inline overrides registry-by-name
    /// overrides entity-name lookup. A missing schema is soft.
    fn resolve_schema(&self, request: &GenerateRequest) -> Result<Option<Arc<Schema>>> {
        if !request.inline_schema.is_empty() {
            let document: Value = serde_json::from_str(&request.inline_schema).map_err(|e| {
                Error::InvalidRequest(format!("inline schema is not valid JSON: {e}"))
            })?;

            if document.get("name").is_some() {
                // Duplicate names are tolerated here: the request still
                // runs with its inline schema.
                match self.registry.register_document(&document) {
                    Ok(()) => tracing::info!(
                        request_id = %request.request_id,
                        "inline_schema_registered"
                    ),
                    Err(Error::SchemaExists(name)) => tracing::warn!(
                        request_id = %request.request_id,
                        schema = %name,
                        "inline_schema_already_registered"
                    ),
                    Err(err) => return Err(err),
                }
            }

            let schema: Schema = serde_json::from_value(document)
                .map_err(|e| Error::InvalidRequest(format!("inline schema invalid: {e}")))?;
            return Ok(Some(Arc::new(schema)));
        }

        if !request.schema_name.is_empty() {
            let found = self.registry.get(&request.schema_name);
            if found.is_none() {
                tracing::warn!(
                    request_id = %request.request_id,
                    schema = %request.schema_name,
                    "schema_not_found"
                );
            }
            return Ok(found);
        }

        if !request.entity.is_empty() {
            let found = self.registry.get(&request.entity);
            if found.is_none() {
                tracing::debug!(
                    request_id = %request.request_id,
                    entity = %request.entity,
                    "entity_schema_not_found"
                );
            }
            return Ok(found);
        }

        Ok(None)
    }

    async fn dispatch(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
        path: Path,
    ) -> Result<GenerationResult> {
        match path {
            Path::Synthetic => self.synthetic.generate(request, ctx).await,
            Path::Llm => self.llm.generate(request, ctx).await,
            Path::Retrieval => self.run_retrieval(request, ctx).await,
            Path::Hybrid => self.run_hybrid(request, ctx).await,
        }
    }

    /// Retrieval path: session per request, synthetic on any failure or
    /// an empty corpus.
    async fn run_retrieval(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        let result = match self.with_retrieval_session(request, ctx, false).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    request_id = %request.request_id,
                    error = %err,
                    falling_back_to = "synthetic",
                    "retrieval_error"
                );
                return self.synthetic.generate(request, ctx).await;
            }
        };

        if result.data.is_empty() {
            tracing::warn!(
                request_id = %request.request_id,
                falling_back_to = "synthetic",
                "retrieval_no_results_fallback"
            );
            return self.synthetic.generate(request, ctx).await;
        }
        Ok(result)
    }

    /// Hybrid path: session per request; retrieval-class failures fall
    /// back to LLM alone, everything else surfaces.
    async fn run_hybrid(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        match self.with_retrieval_session(request, ctx, true).await {
            Ok(result) => Ok(result),
            Err(err) if err.is_soft() => {
                tracing::warn!(
                    request_id = %request.request_id,
                    error = %err,
                    falling_back_to = "llm",
                    "hybrid_error"
                );
                self.llm.generate(request, ctx).await
            }
            Err(err) => Err(err),
        }
    }

    /// Open the vector store session, run the generator, and close the
    /// session on every exit path.
    async fn with_retrieval_session(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
        hybrid: bool,
    ) -> Result<GenerationResult> {
        self.vector_store.connect().await.map_err(Error::from)?;

        let result = if hybrid {
            self.hybrid.generate(request, ctx).await
        } else {
            self.retrieval.generate(request, ctx).await
        };

        self.vector_store.disconnect().await;
        result
    }

    fn finish_success(
        &self,
        request: &GenerateRequest,
        result: GenerationResult,
        decision: &RoutingDecision,
    ) -> GenerateOutcome {
        let start = Instant::now();

        // Mean coherence across records overwrites whatever the generator
        // reported.
        let coherence_score = if result.data.is_empty() {
            0.0
        } else {
            let sum: f64 = result
                .data
                .iter()
                .map(|r| self.scorer.score(r, &request.entity))
                .sum();
            sum / result.data.len() as f64
        };
        if !result.data.is_empty() {
            tracing::info!(
                request_id = %request.request_id,
                entity = %request.entity,
                score = coherence_score,
                "coherence_scored"
            );
            if coherence_score < self.settings.coherence_threshold {
                tracing::warn!(
                    request_id = %request.request_id,
                    score = coherence_score,
                    threshold = self.settings.coherence_threshold,
                    "coherence_below_threshold"
                );
            }
            self.metrics
                .record_coherence_score(&request.domain, coherence_score);
        }

        let mut scenario_counts = BTreeMap::new();
        for record in &result.data {
            let scenario = record
                .get("_scenario")
                .and_then(Value::as_str)
                .unwrap_or("default");
            *scenario_counts.entry(scenario.to_string()).or_insert(0) += 1;
        }

        let generation_path = result
            .metadata
            .get("generation_path")
            .and_then(Value::as_str)
            .unwrap_or(decision.path.as_str())
            .to_string();
        let generation_time_ms = result
            .metadata
            .get("generation_time_ms")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let llm_tokens_used = metadata_tokens(&result.metadata);

        self.metrics.record_request(
            &generation_path,
            &request.domain,
            &request.entity,
            "success",
            generation_time_ms / 1000.0,
        );
        self.metrics.record_records_generated(
            &request.domain,
            &request.entity,
            result.data.len() as u64,
        );

        let record_count = result.data.len() as i64;
        let data = serde_json::to_string_pretty(&result.data).unwrap_or_else(|_| "[]".to_string());

        tracing::info!(
            request_id = %request.request_id,
            record_count,
            serialize_ms = start.elapsed().as_secs_f64() * 1000.0,
            "generate_data_success"
        );

        GenerateOutcome {
            request_id: request.request_id.clone(),
            success: true,
            data,
            record_count,
            error: None,
            metadata: ResponseMetadata {
                generation_path,
                llm_tokens_used,
                generation_time_ms,
                coherence_score,
                scenario_counts,
            },
        }
    }

    fn finish_error(&self, request: &GenerateRequest, err: Error) -> GenerateOutcome {
        self.metrics.record_request(
            "none",
            &request.domain,
            &request.entity,
            "error",
            0.0,
        );
        tracing::error!(
            request_id = %request.request_id,
            error = %err,
            "generate_data_error"
        );

        GenerateOutcome {
            request_id: request.request_id.clone(),
            success: false,
            data: String::new(),
            record_count: 0,
            error: Some(err.to_string()),
            metadata: ResponseMetadata::default(),
        }
    }
}

fn metadata_tokens(metadata: &Map<String, Value>) -> u64 {
    metadata
        .get("llm_tokens_used")
        .or_else(|| metadata.get("tokens_used"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
