//! Language-model-driven generation.
//!
//! Drives the primary text-model backend, parsing its output as a JSON
//! array of records. Parse and shape failures retry with a stricter prompt
//! (up to two extra attempts); on exhaustion a configured secondary backend
//! gets exactly one attempt. Transport retries (rate limit, timeout) live
//! in the client layer.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::clients::llm::TextModel;
use crate::error::{Error, Result};
use crate::generate::{stamp_metadata_fields, GenerationContext, GenerationResult, Generator, Record};
use crate::prompt::{templates::STRICT_JSON_ADDENDUM, PromptBuilder};
use crate::request::GenerateRequest;

/// Stricter-prompt retries after the first parse failure.
const MAX_PARSE_RETRIES: usize = 2;

/// Generator backed by a primary text model with an optional secondary.
pub struct LlmGenerator {
    primary: Arc<dyn TextModel>,
    secondary: Option<Arc<dyn TextModel>>,
    prompt_builder: PromptBuilder,
}

impl LlmGenerator {
    /// New generator over the given backends.
    pub fn new(primary: Arc<dyn TextModel>, secondary: Option<Arc<dyn TextModel>>) -> Self {
        Self {
            primary,
            secondary,
            prompt_builder: PromptBuilder,
        }
    }

    async fn generate_with(
        &self,
        model: &dyn TextModel,
        system: &str,
        user: &str,
    ) -> Result<(Vec<Record>, u64)> {
        let response = model.generate_json(system, user).await?;
        let records = parse_records(response.value)?;
        Ok((records, response.tokens_used))
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    fn path(&self) -> &'static str {
        "llm"
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let (system, mut user) = self.prompt_builder.build(
            request,
            ctx.schema.as_deref(),
            ctx.retrieval_examples.as_deref(),
        );

        tracing::info!(
            request_id = %request.request_id,
            count = request.count,
            entity = %request.entity,
            "llm_generate_start"
        );

        let mut attempts = 0usize;
        loop {
            attempts += 1;
            match self.generate_with(self.primary.as_ref(), &system, &user).await {
                Ok((mut records, tokens_used)) => {
                    stamp_metadata_fields(&mut records);
                    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                    tracing::info!(
                        request_id = %request.request_id,
                        records = records.len(),
                        attempts,
                        "llm_generate_success"
                    );
                    return Ok(finish(
                        records,
                        self.primary.provider(),
                        tokens_used,
                        duration_ms,
                        attempts,
                    ));
                }
                Err(Error::ParseFailure(reason)) => {
                    tracing::warn!(
                        request_id = %request.request_id,
                        attempt = attempts,
                        error = %reason,
                        "llm_parse_error"
                    );
                    if attempts <= MAX_PARSE_RETRIES {
                        user.push_str(STRICT_JSON_ADDENDUM);
                        continue;
                    }

                    let Some(secondary) = &self.secondary else {
                        return Err(Error::ParseFailure(reason));
                    };

                    tracing::info!(request_id = %request.request_id, "llm_fallback_to_secondary");
                    let (mut records, tokens_used) =
                        self.generate_with(secondary.as_ref(), &system, &user).await?;
                    stamp_metadata_fields(&mut records);
                    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                    return Ok(finish(
                        records,
                        secondary.provider(),
                        tokens_used,
                        duration_ms,
                        attempts + 1,
                    ));
                }
                Err(err) => {
                    tracing::error!(
                        request_id = %request.request_id,
                        error = %err,
                        "llm_generate_error"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn supports(&self, request: &GenerateRequest) -> bool {
        if !request.context.is_empty() {
            return true;
        }
        if request.has_hint(&["realistic", "coherent", "intelligent"]) {
            return true;
        }
        if matches!(
            request.entity.as_str(),
            "review" | "comment" | "feedback" | "description"
        ) {
            return true;
        }
        if matches!(request.entity.as_str(), "cart" | "order") && request.has_hint(&["coherent"]) {
            return true;
        }
        request.scenarios.iter().any(|s| !s.description.is_empty())
    }
}

fn finish(
    data: Vec<Record>,
    provider: &str,
    tokens_used: u64,
    duration_ms: f64,
    attempts: usize,
) -> GenerationResult {
    let mut metadata = Map::new();
    metadata.insert("generation_path".to_string(), "llm".into());
    metadata.insert("llm_provider".to_string(), provider.into());
    metadata.insert("tokens_used".to_string(), tokens_used.into());
    metadata.insert("generation_time_ms".to_string(), duration_ms.into());
    metadata.insert("attempts".to_string(), attempts.into());
    GenerationResult { data, metadata }
}

/// Interpret model output as a list of records.
///
/// A lone object becomes a one-element list. Anything else at the top
/// level, or any non-object element, is a parse failure -- no partial
/// recovery is attempted.
fn parse_records(value: Value) -> Result<Vec<Record>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(obj) => vec![Value::Object(obj)],
        other => {
            return Err(Error::ParseFailure(format!(
                "expected JSON array or object, got {}",
                type_name(&other)
            )))
        }
    };

    list.into_iter()
        .map(|item| match item {
            Value::Object(obj) => Ok(obj),
            other => Err(Error::ParseFailure(format!(
                "expected record object, got {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
