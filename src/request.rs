//! Internal request model for generation.
//!
//! The RPC and HTTP layers both convert into [`GenerateRequest`]; the router,
//! prompt builder, and generators only ever see this form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explicit backend selection carried on a request.
///
/// `Auto` delegates the choice to the intelligence router; any other value
/// is honoured verbatim with confidence 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Let the router decide.
    #[default]
    Auto,
    /// Deterministic schema-driven generation.
    Synthetic,
    /// Language-model generation.
    Llm,
    /// Pattern retrieval from the vector store.
    Retrieval,
    /// Retrieval feeding the language model.
    Hybrid,
}

/// A named slice of a request with its own count and field overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, stamped into each record's `_scenario`.
    pub name: String,
    /// Records to produce for this scenario.
    pub count: i64,
    /// Optional free-text description, used for routing and prompts.
    #[serde(default)]
    pub description: String,
    /// Field values applied verbatim instead of generated ones.
    #[serde(default)]
    pub overrides: IndexMap<String, Value>,
}

/// Per-field constraint layered over the schema-level definition.
///
/// Request-level values override schema-level values for the same field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConstraint {
    /// Inclusive numeric minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive numeric maximum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Minimum string length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Allowed enum values; overrides the schema's `values`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Regex pattern, matched from the start of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Format template, e.g. `CRT-{year}-{random:7}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// The unit of work: one generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Opaque correlation id echoed into logs, responses, and chunks.
    pub request_id: String,
    /// Routing/lookup key, e.g. `ecommerce`.
    pub domain: String,
    /// Entity name, e.g. `cart`; doubles as the schema lookup fallback.
    pub entity: String,
    /// Number of records required. Must be positive.
    pub count: i64,
    /// Optional free-text description; a hint to the LLM-class paths.
    #[serde(default)]
    pub context: String,
    /// Lowercase tags influencing routing and prompt selection.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Named slices partitioning `count`.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    /// Field path -> constraint.
    #[serde(default)]
    pub constraints: IndexMap<String, FieldConstraint>,
    /// Registry schema name; `entity` is used when empty.
    #[serde(default)]
    pub schema_name: String,
    /// Inline schema document as JSON text; overrides `schema_name`.
    #[serde(default)]
    pub inline_schema: String,
    /// Bias routing toward retrieval of historical patterns.
    #[serde(default)]
    pub learn_from_history: bool,
    /// Bias routing toward the defect corpus.
    #[serde(default)]
    pub defect_triggering: bool,
    /// Bias routing toward production-like samples.
    #[serde(default)]
    pub production_like: bool,
    /// Explicit backend selection.
    #[serde(default)]
    pub generation_method: GenerationMethod,
}

impl GenerateRequest {
    /// Hints lowered for case-insensitive matching.
    pub fn lowered_hints(&self) -> Vec<String> {
        self.hints.iter().map(|h| h.to_lowercase()).collect()
    }

    /// Whether any lowered hint is in `set`.
    pub fn has_hint(&self, set: &[&str]) -> bool {
        self.hints
            .iter()
            .any(|h| set.contains(&h.to_lowercase().as_str()))
    }

    /// Per-scenario record counts, in declaration order.
    ///
    /// With no scenarios this is a single `default` bucket holding the full
    /// count. When scenario counts do not sum to `count` the mismatch is
    /// logged and the scenario counts win.
    pub fn scenario_distribution(&self) -> Vec<(String, i64)> {
        if self.scenarios.is_empty() {
            return vec![("default".to_string(), self.count)];
        }

        let distribution: Vec<(String, i64)> = self
            .scenarios
            .iter()
            .map(|s| (s.name.clone(), s.count))
            .collect();

        let total: i64 = distribution.iter().map(|(_, c)| c).sum();
        if total != self.count {
            tracing::warn!(
                request_id = %self.request_id,
                expected = self.count,
                actual = total,
                "scenario_count_mismatch"
            );
        }

        distribution
    }

    /// Overrides declared for the named scenario, if any.
    pub fn scenario_overrides(&self, name: &str) -> Option<&IndexMap<String, Value>> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.overrides)
    }
}
