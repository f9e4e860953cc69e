//! HTTP surface for UI tooling and operations.
//!
//! Health and readiness probes, Prometheus exposition, and JSON endpoints
//! that forward to the orchestrator in-process: `POST /generate` and
//! `GET /schemas`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::request::{GenerateRequest, GenerationMethod, Scenario};
use crate::server::orchestrator::Orchestrator;

/// Shared state for the HTTP router.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Build the HTTP router.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/generate", post(generate))
        .route("/schemas", get(schemas))
        .with_state(AppState { orchestrator })
}

/// Run the HTTP server until shutdown.
pub async fn serve(
    orchestrator: Arc<Orchestrator>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let port = orchestrator.settings().http_port;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "http_server_started");

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("http_server_stopped");
    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let settings = state.orchestrator.settings();
    Json(json!({
        "status": "healthy",
        "service": settings.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": settings.environment,
    }))
}

async fn liveness() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn readiness(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "grpc_port": state.orchestrator.settings().grpc_port,
    }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    if !state.orchestrator.settings().prometheus_enabled {
        return (StatusCode::NOT_FOUND, "Metrics disabled").into_response();
    }
    let text = state.orchestrator.metrics().gather();
    ([("content-type", "text/plain; version=0.0.4")], text).into_response()
}

/// JSON body for `POST /generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpGenerateRequest {
    /// Routing domain.
    pub domain: String,
    /// Entity name.
    pub entity: String,
    /// Records to generate.
    #[serde(default = "default_count")]
    pub count: i64,
    /// Free-text hint to LLM-class paths.
    #[serde(default)]
    pub context: Option<String>,
    /// Routing/prompt hint tags.
    #[serde(default)]
    pub hints: Option<Vec<String>>,
    /// Scenario slices.
    #[serde(default)]
    pub scenarios: Option<Vec<HttpScenario>>,
    /// Inline schema document as JSON text.
    #[serde(default)]
    pub inline_schema: Option<String>,
    /// Explicit generation path.
    #[serde(default)]
    pub generation_path: Option<String>,
}

fn default_count() -> i64 {
    10
}

/// Scenario shape accepted over HTTP.
#[derive(Debug, Deserialize)]
pub struct HttpScenario {
    /// Scenario name.
    pub name: String,
    /// Records for this scenario.
    #[serde(default)]
    pub count: i64,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Field overrides.
    #[serde(default)]
    pub overrides: Option<indexmap::IndexMap<String, Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpGenerateResponse {
    success: bool,
    request_id: String,
    data: Value,
    record_count: i64,
    metadata: Value,
    error: Option<String>,
}

async fn generate(
    State(state): State<AppState>,
    Json(body): Json<HttpGenerateRequest>,
) -> Json<HttpGenerateResponse> {
    let request = GenerateRequest {
        request_id: format!("http-{}-{}", body.entity, body.count),
        domain: body.domain,
        entity: body.entity,
        count: body.count,
        context: body.context.unwrap_or_default(),
        hints: body.hints.unwrap_or_default(),
        scenarios: body
            .scenarios
            .unwrap_or_default()
            .into_iter()
            .map(|s| Scenario {
                name: s.name,
                count: s.count,
                description: s.description.unwrap_or_default(),
                overrides: s.overrides.unwrap_or_default(),
            })
            .collect(),
        inline_schema: body.inline_schema.unwrap_or_default(),
        generation_method: parse_generation_path(body.generation_path.as_deref()),
        ..GenerateRequest::default()
    };

    let outcome = state.orchestrator.generate(request).await;
    let data: Value = serde_json::from_str(&outcome.data).unwrap_or(Value::Array(Vec::new()));

    Json(HttpGenerateResponse {
        success: outcome.success,
        request_id: outcome.request_id,
        data,
        record_count: outcome.record_count,
        metadata: json!({
            "generationPath": outcome.metadata.generation_path,
            "llmTokensUsed": outcome.metadata.llm_tokens_used,
            "generationTimeMs": outcome.metadata.generation_time_ms,
            "coherenceScore": outcome.metadata.coherence_score,
            "scenarioCounts": outcome.metadata.scenario_counts,
        }),
        error: outcome.error,
    })
}

fn parse_generation_path(path: Option<&str>) -> GenerationMethod {
    match path.map(|p| p.to_lowercase()).as_deref() {
        Some("synthetic") => GenerationMethod::Synthetic,
        Some("llm") => GenerationMethod::Llm,
        Some("retrieval") | Some("rag") => GenerationMethod::Retrieval,
        Some("hybrid") => GenerationMethod::Hybrid,
        _ => GenerationMethod::Auto,
    }
}

#[derive(Debug, Deserialize)]
struct SchemasQuery {
    domain: Option<String>,
}

async fn schemas(
    State(state): State<AppState>,
    Query(query): Query<SchemasQuery>,
) -> Json<Value> {
    let schemas = state.orchestrator.list_schemas(query.domain.as_deref());
    Json(json!({ "schemas": schemas }))
}
