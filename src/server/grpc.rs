//! gRPC surface.
//!
//! Implements the `DataSmith` service over the orchestrator. Generation
//! failures never cross the boundary as statuses: unary failures return
//! `success=false` with an error string, streaming failures emit a final
//! error chunk.

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use tokio_stream::StreamExt;
use tonic::{Request, Response, Status};
use tracing::Instrument;

use crate::pb;
use crate::pb::data_smith_server::{DataSmith, DataSmithServer};
use crate::request::{FieldConstraint, GenerateRequest, GenerationMethod, Scenario};
use crate::server::orchestrator::{GenerateOutcome, Orchestrator, StreamChunk};

/// gRPC service wrapper around the orchestrator.
pub struct DataSmithService {
    orchestrator: Arc<Orchestrator>,
}

impl DataSmithService {
    /// New service over a shared orchestrator.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Tonic server wrapper, sized for large record payloads.
    pub fn into_server(self) -> DataSmithServer<Self> {
        DataSmithServer::new(self)
            .max_decoding_message_size(50 * 1024 * 1024)
            .max_encoding_message_size(50 * 1024 * 1024)
    }
}

#[tonic::async_trait]
impl DataSmith for DataSmithService {
    async fn generate_data(
        &self,
        request: Request<pb::GenerateRequest>,
    ) -> Result<Response<pb::GenerateResponse>, Status> {
        let request = decode_request(request.into_inner());
        let span = tracing::info_span!("generate_data", request_id = %request.request_id);
        let outcome = self.orchestrator.generate(request).instrument(span).await;
        Ok(Response::new(encode_outcome(outcome)))
    }

    type GenerateDataStreamStream =
        Pin<Box<dyn Stream<Item = Result<pb::DataChunk, Status>> + Send>>;

    async fn generate_data_stream(
        &self,
        request: Request<pb::GenerateRequest>,
    ) -> Result<Response<Self::GenerateDataStreamStream>, Status> {
        let request = decode_request(request.into_inner());
        let stream = self
            .orchestrator
            .clone()
            .generate_stream(request)
            .map(|chunk| Ok(encode_chunk(chunk)));
        Ok(Response::new(Box::pin(stream)))
    }

    async fn get_schemas(
        &self,
        request: Request<pb::GetSchemasRequest>,
    ) -> Result<Response<pb::GetSchemasResponse>, Status> {
        let domain = request.into_inner().domain;
        let domain = if domain.is_empty() {
            None
        } else {
            Some(domain)
        };
        tracing::info!(domain = domain.as_deref().unwrap_or("all"), "get_schemas_request");

        let schemas = self
            .orchestrator
            .list_schemas(domain.as_deref())
            .into_iter()
            .map(|info| pb::SchemaInfo {
                name: info.name,
                domain: info.domain,
                description: info.description,
                fields: info
                    .fields
                    .into_iter()
                    .map(|f| pb::SchemaFieldInfo {
                        name: f.name,
                        r#type: f.field_type,
                        required: f.required,
                        description: f.description,
                        example: f.example,
                    })
                    .collect(),
            })
            .collect();

        Ok(Response::new(pb::GetSchemasResponse { schemas }))
    }

    async fn health_check(
        &self,
        _request: Request<pb::HealthCheckRequest>,
    ) -> Result<Response<pb::HealthCheckResponse>, Status> {
        let components = self
            .orchestrator
            .health_components()
            .await
            .into_iter()
            .collect();
        Ok(Response::new(pb::HealthCheckResponse {
            status: "healthy".to_string(),
            components,
        }))
    }
}

/// Run the gRPC server (with reflection) until shutdown.
pub async fn serve(
    orchestrator: Arc<Orchestrator>,
    shutdown: impl std::future::Future<Output = ()>,
) -> anyhow::Result<()> {
    let port = orchestrator.settings().grpc_port;
    let addr = format!("0.0.0.0:{port}").parse()?;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    tracing::info!(%addr, "grpc_server_started");
    tonic::transport::Server::builder()
        .add_service(DataSmithService::new(orchestrator).into_server())
        .add_service(reflection)
        .serve_with_shutdown(addr, shutdown)
        .await?;
    tracing::info!("grpc_server_stopped");
    Ok(())
}

/// Convert the wire request into the internal model.
///
/// Scenario override values are parsed as JSON where possible so numeric
/// and boolean overrides survive the string map; anything unparseable
/// passes through as a string.
pub fn decode_request(pb: pb::GenerateRequest) -> GenerateRequest {
    let generation_method = match pb.generation_method() {
        pb::GenerationMethod::Auto => GenerationMethod::Auto,
        pb::GenerationMethod::Synthetic => GenerationMethod::Synthetic,
        pb::GenerationMethod::Llm => GenerationMethod::Llm,
        pb::GenerationMethod::Retrieval => GenerationMethod::Retrieval,
        pb::GenerationMethod::Hybrid => GenerationMethod::Hybrid,
    };

    GenerateRequest {
        request_id: pb.request_id,
        domain: pb.domain,
        entity: pb.entity,
        count: i64::from(pb.count),
        context: pb.context,
        hints: pb.hints,
        scenarios: pb
            .scenarios
            .into_iter()
            .map(|s| Scenario {
                name: s.name,
                count: i64::from(s.count),
                description: s.description,
                overrides: s
                    .overrides
                    .into_iter()
                    .map(|(k, v)| {
                        let value = serde_json::from_str(&v).unwrap_or(serde_json::Value::String(v));
                        (k, value)
                    })
                    .collect(),
            })
            .collect(),
        constraints: pb
            .constraints
            .into_iter()
            .map(|(field, c)| {
                (
                    field,
                    FieldConstraint {
                        min: c.min,
                        max: c.max,
                        min_length: c.min_length.map(|v| v.max(0) as usize),
                        max_length: c.max_length.map(|v| v.max(0) as usize),
                        enum_values: c.enum_values,
                        regex: c.regex,
                        format: c.format,
                    },
                )
            })
            .collect(),
        schema_name: pb.schema_name,
        inline_schema: pb.inline_schema,
        learn_from_history: pb.learn_from_history,
        defect_triggering: pb.defect_triggering,
        production_like: pb.production_like,
        generation_method,
    }
}

fn encode_outcome(outcome: GenerateOutcome) -> pb::GenerateResponse {
    pb::GenerateResponse {
        request_id: outcome.request_id,
        success: outcome.success,
        data: outcome.data,
        record_count: outcome.record_count as i32,
        error: outcome.error.unwrap_or_default(),
        metadata: Some(pb::GenerationMetadata {
            generation_path: outcome.metadata.generation_path,
            llm_tokens_used: outcome.metadata.llm_tokens_used,
            generation_time_ms: outcome.metadata.generation_time_ms,
            coherence_score: outcome.metadata.coherence_score,
            scenario_counts: outcome
                .metadata
                .scenario_counts
                .into_iter()
                .map(|(k, v)| (k, v as i32))
                .collect(),
        }),
    }
}

fn encode_chunk(chunk: StreamChunk) -> pb::DataChunk {
    pb::DataChunk {
        request_id: chunk.request_id,
        data: chunk.data,
        chunk_index: chunk.chunk_index as i32,
        is_final: chunk.is_final,
    }
}
