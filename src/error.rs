//! Unified error types for the datasmith service.
//!
//! One variant per failure class the pipeline can produce. Backend client
//! modules define their own narrow error types and convert into [`Error`]
//! at the generator boundary, so the orchestrator handles a single taxonomy.

use thiserror::Error;

/// Unified error type for generation operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is malformed (bad inline schema JSON, count <= 0).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unary record count exceeds the configured sync limit.
    #[error("count {requested} exceeds max sync limit {limit}. Use the streaming RPC instead.")]
    LimitExceeded {
        /// Requested record count.
        requested: i64,
        /// Configured maximum for the unary RPC.
        limit: i64,
    },

    /// No schema was resolvable for the request. Soft: generation proceeds
    /// without a schema, so this surfaces only from registry lookups that
    /// must succeed.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// A schema failed structural validation on registration.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A schema with the same name is already registered.
    #[error("schema '{0}' already exists")]
    SchemaExists(String),

    /// The text-model backend rejected the call for rate limiting.
    #[error("backend rate limited: {0}")]
    BackendRateLimit(String),

    /// The text-model backend timed out.
    #[error("backend timed out: {0}")]
    BackendTimeout(String),

    /// The text-model backend rejected credentials. Never retried.
    #[error("backend authentication failed: {0}")]
    BackendAuth(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    BackendOther(String),

    /// LLM output was not parseable as a JSON array of objects.
    #[error("failed to parse model output: {0}")]
    ParseFailure(String),

    /// Retrieval returned zero patterns. Soft: the orchestrator falls back.
    #[error("no patterns found in collection '{0}'")]
    RetrievalEmpty(String),

    /// The vector store could not be reached or the search failed.
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Anything that should not happen.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the orchestrator may silently fall back to another path.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Error::RetrievalEmpty(_) | Error::RetrievalUnavailable(_) | Error::SchemaNotFound(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
