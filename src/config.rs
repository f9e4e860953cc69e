//! Service configuration.
//!
//! Every setting is overridable from the environment; defaults match the
//! deployment the service ships with. The binary exposes them as CLI flags
//! too, which is what the test-automation platform's compose files use.

use clap::{Args, Parser, Subcommand};

/// Application settings, loaded from flags and environment variables.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Service name reported by health endpoints.
    #[arg(long, env = "SERVICE_NAME", default_value = "datasmith")]
    pub service_name: String,

    /// Port for the gRPC surface.
    #[arg(long, env = "GRPC_PORT", default_value_t = 9091)]
    pub grpc_port: u16,

    /// Port for the HTTP surface.
    #[arg(long, env = "HTTP_PORT", default_value_t = 8091)]
    pub http_port: u16,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Deployment environment name; non-development output is JSON.
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// API key for the hosted model backend. Required for the LLM path.
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    pub anthropic_api_key: Option<String>,

    /// Hosted model identifier.
    #[arg(long, env = "CLAUDE_MODEL", default_value = "claude-sonnet-4-20250514")]
    pub claude_model: String,

    /// Completion token budget per model call.
    #[arg(long, env = "CLAUDE_MAX_TOKENS", default_value_t = 4096)]
    pub claude_max_tokens: u32,

    /// Sampling temperature for model calls.
    #[arg(long, env = "CLAUDE_TEMPERATURE", default_value_t = 0.7)]
    pub claude_temperature: f64,

    /// OpenAI-compatible base URL for the local model server.
    #[arg(long, env = "VLLM_BASE_URL", default_value = "http://vllm:8000/v1")]
    pub vllm_base_url: String,

    /// Local model identifier.
    #[arg(
        long,
        env = "VLLM_MODEL",
        default_value = "meta-llama/Meta-Llama-3-8B-Instruct"
    )]
    pub vllm_model: String,

    /// Enable the local model as the secondary backend.
    #[arg(long, env = "USE_LOCAL_LLM", default_value_t = false, action = clap::ArgAction::Set)]
    pub use_local_llm: bool,

    /// Vector store URL.
    #[arg(long, env = "WEAVIATE_URL", default_value = "http://weaviate:8080")]
    pub weaviate_url: String,

    /// Patterns retrieved per search.
    #[arg(long, env = "RAG_TOP_K", default_value_t = 5)]
    pub rag_top_k: usize,

    /// Cache server URL.
    #[arg(long, env = "REDIS_URL", default_value = "redis://redis:6379/0")]
    pub redis_url: String,

    /// Default cache TTL in seconds.
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value_t = 86_400)]
    pub cache_ttl_seconds: u64,

    /// Unary record limit; larger requests must stream.
    #[arg(long, env = "MAX_SYNC_RECORDS", default_value_t = 1000)]
    pub max_sync_records: i64,

    /// Records per streamed chunk.
    #[arg(long, env = "DEFAULT_BATCH_SIZE", default_value_t = 50)]
    pub default_batch_size: usize,

    /// Coherence score below which a warning is logged.
    #[arg(long, env = "COHERENCE_THRESHOLD", default_value_t = 0.85)]
    pub coherence_threshold: f64,

    /// Expose Prometheus metrics on /metrics.
    #[arg(long, env = "PROMETHEUS_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    pub prometheus_enabled: bool,

    /// Enable OpenTelemetry trace export.
    #[arg(long, env = "TRACING_ENABLED", default_value_t = false, action = clap::ArgAction::Set)]
    pub tracing_enabled: bool,

    /// OTLP collector endpoint.
    #[arg(
        long,
        env = "OTLP_ENDPOINT",
        default_value = "http://otel-collector:4317"
    )]
    pub otlp_endpoint: String,
}

impl Settings {
    /// Default settings without touching the process environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            service_name: "datasmith".to_string(),
            grpc_port: 9091,
            http_port: 8091,
            log_level: "INFO".to_string(),
            environment: "test".to_string(),
            anthropic_api_key: None,
            claude_model: "claude-sonnet-4-20250514".to_string(),
            claude_max_tokens: 4096,
            claude_temperature: 0.7,
            vllm_base_url: "http://127.0.0.1:1/v1".to_string(),
            vllm_model: "meta-llama/Meta-Llama-3-8B-Instruct".to_string(),
            use_local_llm: false,
            weaviate_url: "http://127.0.0.1:1".to_string(),
            rag_top_k: 5,
            redis_url: "redis://127.0.0.1:1/0".to_string(),
            cache_ttl_seconds: 86_400,
            max_sync_records: 1000,
            default_batch_size: 50,
            coherence_threshold: 0.85,
            prometheus_enabled: true,
            tracing_enabled: false,
            otlp_endpoint: "http://127.0.0.1:1".to_string(),
        }
    }
}

/// Command-line interface for the service binary.
#[derive(Debug, Parser)]
#[command(name = "datasmith", about = "Coherent synthetic retail data service")]
pub struct Cli {
    /// Shared settings.
    #[command(flatten)]
    pub settings: Settings,

    /// What to run; defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Binary subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the gRPC and HTTP servers.
    Serve,
    /// Seed the vector store corpora with starter patterns.
    Seed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::for_tests();
        assert_eq!(settings.grpc_port, 9091);
        assert_eq!(settings.http_port, 8091);
        assert_eq!(settings.max_sync_records, 1000);
        assert_eq!(settings.default_batch_size, 50);
        assert_eq!(settings.rag_top_k, 5);
        assert!(settings.anthropic_api_key.is_none());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "datasmith",
            "--grpc-port",
            "7001",
            "--use-local-llm",
            "true",
            "seed",
        ]);
        assert_eq!(cli.settings.grpc_port, 7001);
        assert!(cli.settings.use_local_llm);
        assert!(matches!(cli.command, Some(Command::Seed)));
    }
}
