//! Text-model backend clients.
//!
//! A primary Anthropic-API client and an optional OpenAI-compatible client
//! for a locally hosted model, behind one [`TextModel`] trait. Transport
//! retries live here: rate limits and timeouts back off exponentially for
//! up to three attempts; authentication and other API errors surface
//! immediately. JSON extraction handles code fences and stray whitespace
//! but never attempts partial recovery.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Settings;
use crate::error::Error;

/// Attempts per backend call.
const MAX_RETRIES: u32 = 3;
/// Base backoff delay; attempt `k` sleeps `base * 2^k`.
const BASE_DELAY_SECS: f64 = 1.0;

/// Failure classes for a text-model call.
#[derive(Debug, Error)]
pub enum TextModelError {
    /// The backend asked us to slow down. Retried with backoff.
    #[error("rate limited: {0}")]
    RateLimit(String),
    /// The call timed out. Retried with backoff.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Credentials were rejected. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The response body was not the JSON we asked for.
    #[error("response was not valid JSON: {0}")]
    Parse(String),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl From<TextModelError> for Error {
    fn from(err: TextModelError) -> Self {
        match err {
            TextModelError::RateLimit(m) => Error::BackendRateLimit(m),
            TextModelError::Timeout(m) => Error::BackendTimeout(m),
            TextModelError::Auth(m) => Error::BackendAuth(m),
            TextModelError::Parse(m) => Error::ParseFailure(m),
            TextModelError::Other(m) => Error::BackendOther(m),
        }
    }
}

/// One model completion.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Raw text content.
    pub content: String,
    /// Input + output tokens, when the backend reports usage.
    pub tokens_used: u64,
}

/// Parsed JSON plus usage, from [`TextModel::generate_json`].
#[derive(Debug, Clone)]
pub struct ModelJson {
    /// Parsed top-level JSON value.
    pub value: Value,
    /// Input + output tokens.
    pub tokens_used: u64,
}

/// A text-completion backend.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Short provider name for metadata (`claude`, `local`).
    fn provider(&self) -> &str;

    /// One completion call, no retries.
    async fn complete(&self, system: &str, user: &str) -> Result<ModelResponse, TextModelError>;

    /// Completion with transport retries, returning parsed JSON.
    ///
    /// Rate-limit and timeout failures back off exponentially for up to
    /// three attempts; other failures surface immediately.
    async fn generate_json(&self, system: &str, user: &str) -> Result<ModelJson, TextModelError> {
        let mut attempt = 0;
        loop {
            match self.complete(system, user).await {
                Ok(response) => {
                    let content = strip_code_fence(response.content.trim());
                    let value: Value = serde_json::from_str(content)
                        .map_err(|e| TextModelError::Parse(e.to_string()))?;
                    return Ok(ModelJson {
                        value,
                        tokens_used: response.tokens_used,
                    });
                }
                Err(err @ (TextModelError::RateLimit(_) | TextModelError::Timeout(_))) => {
                    attempt += 1;
                    if attempt >= MAX_RETRIES {
                        tracing::error!(provider = self.provider(), error = %err, "backend_retries_exhausted");
                        return Err(err);
                    }
                    let delay = BASE_DELAY_SECS * f64::from(1u32 << (attempt - 1));
                    tracing::warn!(
                        provider = self.provider(),
                        attempt,
                        retry_delay = delay,
                        "backend_retryable_error"
                    );
                    tokio::time::sleep(Duration::from_secs_f64(delay)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Strip a surrounding ``` fence (with optional `json` tag) if present.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let after_fence = trimmed.trim_start_matches("```");
    let after_tag = after_fence.strip_prefix("json").unwrap_or(after_fence);
    let inner = after_tag.strip_suffix("```").unwrap_or(after_tag);
    inner.trim()
}

/// Client for the Anthropic messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl AnthropicClient {
    /// API endpoint for the hosted service.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    /// Build a client from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: settings.anthropic_api_key.clone().unwrap_or_default(),
            model: settings.claude_model.clone(),
            max_tokens: settings.claude_max_tokens,
            temperature: settings.claude_temperature,
        }
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextModel for AnthropicClient {
    fn provider(&self) -> &str {
        "claude"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<ModelResponse, TextModelError> {
        if self.api_key.is_empty() {
            return Err(TextModelError::Auth(
                "ANTHROPIC_API_KEY is not configured".to_string(),
            ));
        }

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system,
            "messages": [{"role": "user", "content": user}],
        });

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, detail));
        }

        let payload: Value = response
            .text()
            .await
            .map_err(classify_transport_error)
            .and_then(|text| {
                serde_json::from_str(&text).map_err(|e| TextModelError::Other(e.to_string()))
            })?;

        let content = payload["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| b["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let tokens_used = payload["usage"]["input_tokens"].as_u64().unwrap_or(0)
            + payload["usage"]["output_tokens"].as_u64().unwrap_or(0);

        tracing::debug!(tokens_used, "claude_api_success");
        Ok(ModelResponse {
            content,
            tokens_used,
        })
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint, as exposed by
/// a locally hosted model server.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatClient {
    /// Build a client from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.vllm_base_url.trim_end_matches('/').to_string(),
            model: settings.vllm_model.clone(),
            max_tokens: settings.claude_max_tokens,
            temperature: settings.claude_temperature,
        }
    }
}

#[async_trait]
impl TextModel for OpenAiCompatClient {
    fn provider(&self) -> &str {
        "local"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<ModelResponse, TextModelError> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, detail));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TextModelError::Other(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let tokens_used = payload["usage"]["prompt_tokens"].as_u64().unwrap_or(0)
            + payload["usage"]["completion_tokens"].as_u64().unwrap_or(0);

        Ok(ModelResponse {
            content,
            tokens_used,
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> TextModelError {
    if err.is_timeout() {
        TextModelError::Timeout(err.to_string())
    } else {
        TextModelError::Other(err.to_string())
    }
}

fn classify_status(status: reqwest::StatusCode, detail: String) -> TextModelError {
    match status.as_u16() {
        429 => TextModelError::RateLimit(detail),
        401 | 403 => TextModelError::Auth(detail),
        408 | 504 => TextModelError::Timeout(detail),
        _ => TextModelError::Other(format!("status {status}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  \n```json\n[]\n```  "), "[]");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new()),
            TextModelError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(reqwest::StatusCode::UNAUTHORIZED, String::new()),
            TextModelError::Auth(_)
        ));
        assert!(matches!(
            classify_status(reqwest::StatusCode::GATEWAY_TIMEOUT, String::new()),
            TextModelError::Timeout(_)
        ));
        assert!(matches!(
            classify_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            TextModelError::Other(_)
        ));
    }

    #[test]
    fn test_error_conversion_to_taxonomy() {
        let err: Error = TextModelError::RateLimit("slow down".into()).into();
        assert!(matches!(err, Error::BackendRateLimit(_)));
        let err: Error = TextModelError::Parse("bad".into()).into();
        assert!(matches!(err, Error::ParseFailure(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_auth_error() {
        let settings = Settings::for_tests();
        let client = AnthropicClient::new(&settings);
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, TextModelError::Auth(_)));
    }
}
