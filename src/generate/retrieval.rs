//! Pattern-retrieval generation.
//!
//! Searches a corpus collection for patterns matching the request, then
//! composes new records by varying each pattern's dynamic fields: patterned
//! IDs get a new trailing number derived deterministically from the source
//! id and variation index, timestamps are refreshed to now, and bare
//! `uuid`/`id` fields get fresh identifiers. IDs are stable within a
//! request but carry no uniqueness guarantee across requests.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::clients::vector::{Collection, PatternHit, VectorStore};
use crate::error::Result;
use crate::generate::{stamp_metadata_fields, GenerationContext, GenerationResult, Generator, Record};
use crate::providers::datetime::now_iso;
use crate::request::GenerateRequest;

/// Patterned ID fields eligible for trailing-number regeneration.
const ID_FIELDS: &[&str] = &[
    "cart_id",
    "order_id",
    "payment_id",
    "user_id",
    "review_id",
    "transaction_id",
];

/// Timestamp fields refreshed to the current time.
const TIMESTAMP_FIELDS: &[&str] = &["created_at", "updated_at", "modified_at", "timestamp"];

/// Generator that composes records from retrieved patterns.
pub struct RetrievalGenerator {
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl RetrievalGenerator {
    /// New generator searching `store` for the top `top_k` patterns.
    pub fn new(store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    /// Which corpus a request draws from.
    pub fn select_collection(request: &GenerateRequest) -> Collection {
        if request.defect_triggering {
            Collection::Defects
        } else if request.production_like {
            Collection::Production
        } else {
            Collection::Patterns
        }
    }

    /// Concatenated search text from the request's routing keys, context,
    /// and scenario descriptions.
    pub fn build_search_query(request: &GenerateRequest) -> String {
        let mut parts = Vec::new();
        if !request.domain.is_empty() {
            parts.push(format!("domain: {}", request.domain));
        }
        if !request.entity.is_empty() {
            parts.push(format!("entity: {}", request.entity));
        }
        if !request.context.is_empty() {
            parts.push(request.context.clone());
        }
        for scenario in &request.scenarios {
            if !scenario.description.is_empty() {
                parts.push(scenario.description.clone());
            }
        }

        if parts.is_empty() {
            format!("{} {} test data", request.domain, request.entity)
        } else {
            parts.join(" ")
        }
    }
}

#[async_trait]
impl Generator for RetrievalGenerator {
    fn path(&self) -> &'static str {
        "retrieval"
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        _ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let collection = Self::select_collection(request);
        let query = Self::build_search_query(request);

        tracing::info!(
            request_id = %request.request_id,
            count = request.count,
            entity = %request.entity,
            collection = collection.name(),
            "retrieval_generate_start"
        );

        let patterns = self.store.search(collection, &query, self.top_k).await?;

        if patterns.is_empty() {
            tracing::warn!(
                request_id = %request.request_id,
                collection = collection.name(),
                "retrieval_no_patterns_found"
            );
            let mut metadata = Map::new();
            metadata.insert("generation_path".to_string(), "retrieval".into());
            metadata.insert("rag_collection".to_string(), collection.name().into());
            metadata.insert("rag_patterns_found".to_string(), 0.into());
            metadata.insert(
                "generation_time_ms".to_string(),
                (start.elapsed().as_secs_f64() * 1000.0).into(),
            );
            return Ok(GenerationResult {
                data: Vec::new(),
                metadata,
            });
        }

        let patterns_found = patterns.len();
        let mut records = compose_from_patterns(&patterns, request.count.max(0) as usize);
        stamp_metadata_fields(&mut records);

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            request_id = %request.request_id,
            records = records.len(),
            patterns_used = patterns_found,
            "retrieval_generate_success"
        );

        let mut metadata = Map::new();
        metadata.insert("generation_path".to_string(), "retrieval".into());
        metadata.insert("rag_collection".to_string(), collection.name().into());
        metadata.insert("rag_patterns_found".to_string(), patterns_found.into());
        metadata.insert("generation_time_ms".to_string(), duration_ms.into());

        Ok(GenerationResult {
            data: records,
            metadata,
        })
    }

    fn supports(&self, request: &GenerateRequest) -> bool {
        request.learn_from_history
            || request.defect_triggering
            || request.production_like
            || request.has_hint(&["similar", "pattern", "historical", "production"])
    }
}

/// Allocate `count` records proportionally over the patterns and vary each.
///
/// With `k` patterns: `base = count / k`, `rem = count % k`; the first
/// `rem` patterns produce `base + 1` variations, the rest `base`.
fn compose_from_patterns(patterns: &[PatternHit], count: usize) -> Vec<Record> {
    let base = count / patterns.len();
    let rem = count % patterns.len();

    let mut records = Vec::with_capacity(count);
    'outer: for (idx, pattern) in patterns.iter().enumerate() {
        let Some(template) = extract_template(&pattern.data) else {
            tracing::warn!(pattern_id = %pattern.id, "retrieval_pattern_parse_error");
            continue;
        };

        let variations = base + usize::from(idx < rem);
        for i in 0..variations {
            records.push(create_variation(&template, i));
            if records.len() >= count {
                break 'outer;
            }
        }
    }

    records.truncate(count);
    records
}

/// Dig the example record out of a pattern payload.
///
/// Bodies appear under `data`, `trigger_data`, or `anonymized_data`
/// depending on the corpus, sometimes as JSON-encoded strings. Parse
/// defensively and fall back to the payload itself.
fn extract_template(payload: &Value) -> Option<Record> {
    let payload = decode(payload)?;

    for key in ["data", "trigger_data", "anonymized_data"] {
        if let Some(inner) = payload.get(key) {
            if let Some(record) = decode(inner).as_ref().and_then(Value::as_object) {
                return Some(record.clone());
            }
        }
    }

    payload.as_object().cloned()
}

/// Parse a JSON-encoded string in place; pass other values through.
fn decode(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

/// Copy a template and refresh its dynamic fields.
fn create_variation(template: &Record, index: usize) -> Record {
    let mut variation = template.clone();

    for field in ID_FIELDS {
        let Some(original) = variation.get(*field).and_then(Value::as_str) else {
            continue;
        };
        // Regenerate only PREFIX-YEAR-NNNNNNN shaped ids, keeping the
        // prefix and year.
        let parts: Vec<&str> = original.split('-').collect();
        if parts.len() == 3 {
            let new_num = derive_trailing_number(original, index);
            let replacement = format!("{}-{}-{:07}", parts[0], parts[1], new_num);
            variation.insert((*field).to_string(), replacement.into());
        }
    }

    let now = now_iso();
    for field in TIMESTAMP_FIELDS {
        if variation.contains_key(*field) {
            variation.insert((*field).to_string(), now.clone().into());
        }
    }

    let fresh_key = if variation.contains_key("uuid") {
        Some("uuid")
    } else if variation.contains_key("id") {
        Some("id")
    } else {
        None
    };
    if let Some(key) = fresh_key {
        variation.insert(key.to_string(), uuid::Uuid::new_v4().to_string().into());
    }

    variation
}

/// Deterministic trailing number: hash of source id + variation index,
/// modulo 10^7.
fn derive_trailing_number(original: &str, index: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    format!("{original}{index}").hash(&mut hasher);
    hasher.finish() % 10_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::MemoryVectorStore;
    use serde_json::json;

    fn request(count: i64) -> GenerateRequest {
        GenerateRequest {
            request_id: "test".to_string(),
            domain: "ecommerce".to_string(),
            entity: "cart".to_string(),
            count,
            ..GenerateRequest::default()
        }
    }

    fn cart_pattern(n: u32) -> Value {
        json!({
            "data": {
                "cart_id": format!("CRT-2024-{:07}", n),
                "total": 50.0 + f64::from(n),
                "created_at": "2024-01-01T00:00:00+00:00"
            }
        })
    }

    async fn connected_store(patterns: Vec<Value>) -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        store.seed(Collection::Defects, patterns.clone());
        store.seed(Collection::Patterns, patterns);
        store.connect().await.unwrap();
        store
    }

    #[test]
    fn test_collection_selection() {
        let mut req = request(1);
        assert_eq!(
            RetrievalGenerator::select_collection(&req),
            Collection::Patterns
        );
        req.production_like = true;
        assert_eq!(
            RetrievalGenerator::select_collection(&req),
            Collection::Production
        );
        req.defect_triggering = true;
        // Defect bias wins over production bias.
        assert_eq!(
            RetrievalGenerator::select_collection(&req),
            Collection::Defects
        );
    }

    #[test]
    fn test_query_concatenation_and_fallback() {
        let mut req = request(1);
        req.context = "checkout with coupon".to_string();
        let query = RetrievalGenerator::build_search_query(&req);
        assert!(query.contains("domain: ecommerce"));
        assert!(query.contains("entity: cart"));
        assert!(query.contains("checkout with coupon"));

        let empty = GenerateRequest::default();
        assert_eq!(
            RetrievalGenerator::build_search_query(&empty),
            "  test data"
        );
    }

    #[tokio::test]
    async fn test_generates_exact_count_from_patterns() {
        let store = connected_store((0..5).map(cart_pattern).collect()).await;
        let generator = RetrievalGenerator::new(store, 5);

        let mut req = request(4);
        req.defect_triggering = true;

        let result = generator
            .generate(&req, &GenerationContext::default())
            .await
            .unwrap();
        assert_eq!(result.data.len(), 4);
        assert_eq!(result.metadata["rag_patterns_found"], json!(5));
        assert_eq!(result.metadata["rag_collection"], json!("DefectPattern"));
    }

    #[tokio::test]
    async fn test_ids_keep_prefix_and_year_but_differ() {
        let store = connected_store((0..5).map(cart_pattern).collect()).await;
        let generator = RetrievalGenerator::new(store, 5);

        let mut req = request(4);
        req.defect_triggering = true;

        let result = generator
            .generate(&req, &GenerationContext::default())
            .await
            .unwrap();
        for record in &result.data {
            let id = record["cart_id"].as_str().unwrap();
            assert!(id.starts_with("CRT-2024-"), "unexpected id {id}");
            let trailing = id.rsplit('-').next().unwrap();
            assert_eq!(trailing.len(), 7);
        }
        // Variations of different source patterns get different numbers.
        let ids: std::collections::HashSet<&str> = result
            .data
            .iter()
            .map(|r| r["cart_id"].as_str().unwrap())
            .collect();
        assert!(ids.len() > 1);
    }

    #[tokio::test]
    async fn test_timestamps_are_refreshed() {
        let store = connected_store(vec![cart_pattern(1)]).await;
        let generator = RetrievalGenerator::new(store, 5);

        let mut req = request(2);
        req.learn_from_history = true;

        let result = generator
            .generate(&req, &GenerationContext::default())
            .await
            .unwrap();
        for record in &result.data {
            let created = record["created_at"].as_str().unwrap();
            assert!(!created.starts_with("2024-01-01"));
        }
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_empty_result() {
        let store = Arc::new(MemoryVectorStore::new());
        store.connect().await.unwrap();
        let generator = RetrievalGenerator::new(store, 5);

        let result = generator
            .generate(&request(5), &GenerationContext::default())
            .await
            .unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.metadata["rag_patterns_found"], json!(0));
    }

    #[test]
    fn test_allocation_is_proportional() {
        let patterns: Vec<PatternHit> = (0..5)
            .map(|n| PatternHit {
                id: format!("p{n}"),
                data: cart_pattern(n),
                score: None,
            })
            .collect();

        // 12 = 5*2 + 2: first two patterns produce 3, the rest 2.
        let records = compose_from_patterns(&patterns, 12);
        assert_eq!(records.len(), 12);

        // count < k: one variation each from the first `count` patterns.
        let records = compose_from_patterns(&patterns, 3);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_variation_is_deterministic_within_request() {
        let template = json!({"cart_id": "CRT-2024-0000001"})
            .as_object()
            .unwrap()
            .clone();
        let a = create_variation(&template, 3);
        let b = create_variation(&template, 3);
        assert_eq!(a["cart_id"], b["cart_id"]);

        let c = create_variation(&template, 4);
        assert_ne!(a["cart_id"], c["cart_id"]);
    }

    #[test]
    fn test_template_extraction_variants() {
        // Nested under data as object.
        let t = extract_template(&json!({"data": {"a": 1}})).unwrap();
        assert_eq!(t["a"], json!(1));

        // Nested under trigger_data as JSON string.
        let t = extract_template(&json!({"trigger_data": "{\"b\": 2}"})).unwrap();
        assert_eq!(t["b"], json!(2));

        // Bare object payload.
        let t = extract_template(&json!({"c": 3})).unwrap();
        assert_eq!(t["c"], json!(3));

        // Unparseable string payload.
        assert!(extract_template(&json!("not json")).is_none());
    }

    #[test]
    fn test_fresh_uuid_for_id_key() {
        let template = json!({"id": "old", "uuid": "older"})
            .as_object()
            .unwrap()
            .clone();
        let v = create_variation(&template, 0);
        // `uuid` wins when both are present.
        assert_ne!(v["uuid"], json!("older"));
        assert_eq!(v["id"], json!("old"));
    }

    #[test]
    fn test_supports_flags_and_hints() {
        let store = Arc::new(MemoryVectorStore::new());
        let generator = RetrievalGenerator::new(store, 5);

        assert!(!generator.supports(&request(1)));

        let mut req = request(1);
        req.learn_from_history = true;
        assert!(generator.supports(&req));

        let mut req = request(1);
        req.hints = vec!["historical".to_string()];
        assert!(generator.supports(&req));
    }
}
