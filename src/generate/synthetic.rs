//! Deterministic schema-driven generation.
//!
//! The universal fallback: builds records by walking the schema's field
//! table in declaration order, dispatching on field type with field-name
//! heuristics for strings. A seeded run reproduces its output exactly.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::generate::{stamp_metadata_fields, GenerationContext, GenerationResult, Generator, Record};
use crate::providers::{address, datetime, identifiers, internet, names, numbers, phone, text};
use crate::request::{FieldConstraint, GenerateRequest};
use crate::rng::SmithRng;
use crate::schema::{FieldDef, FieldType, Schema, SchemaRegistry};

/// Array fields default to this many elements.
const ARRAY_LEN_RANGE: (i64, i64) = (2, 5);

/// Deterministic-style generator over seeded randomness.
pub struct SyntheticGenerator {
    registry: Arc<SchemaRegistry>,
    seed: Option<u64>,
}

impl SyntheticGenerator {
    /// New generator resolving schemas from `registry`.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            seed: None,
        }
    }

    /// Fix the RNG seed so repeated invocations reproduce their output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn resolve_schema(&self, request: &GenerateRequest, ctx: &GenerationContext) -> Arc<Schema> {
        if let Some(schema) = &ctx.schema {
            return schema.clone();
        }
        if !request.schema_name.is_empty() {
            if let Some(schema) = self.registry.get(&request.schema_name) {
                return schema;
            }
        }
        if !request.entity.is_empty() {
            if let Some(schema) = self.registry.get(&request.entity) {
                return schema;
            }
        }
        Arc::new(Schema::minimal(&request.entity, &request.domain))
    }
}

#[async_trait]
impl Generator for SyntheticGenerator {
    fn path(&self) -> &'static str {
        "synthetic"
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let schema = self.resolve_schema(request, ctx);
        let mut rng = match self.seed {
            Some(seed) => SmithRng::seeded(seed),
            None => SmithRng::new(),
        };

        let mut records = Vec::with_capacity(request.count.max(0) as usize);
        for (scenario_name, scenario_count) in request.scenario_distribution() {
            let overrides = request.scenario_overrides(&scenario_name);

            for _ in 0..scenario_count.max(0) {
                let mut record =
                    generate_record(&mut rng, &schema, &request.constraints, overrides);
                record.insert("_scenario".to_string(), scenario_name.clone().into());
                records.push(record);
            }
        }

        stamp_metadata_fields(&mut records);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            request_id = %request.request_id,
            count = records.len(),
            duration_ms,
            "synthetic_generation_complete"
        );

        let mut metadata = Map::new();
        metadata.insert("generation_path".to_string(), "synthetic".into());
        metadata.insert("generation_time_ms".to_string(), duration_ms.into());
        metadata.insert("record_count".to_string(), records.len().into());

        Ok(GenerationResult {
            data: records,
            metadata,
        })
    }

    /// The synthetic path handles any request; it is the universal fallback.
    fn supports(&self, _request: &GenerateRequest) -> bool {
        true
    }
}

fn generate_record(
    rng: &mut SmithRng,
    schema: &Schema,
    constraints: &indexmap::IndexMap<String, FieldConstraint>,
    overrides: Option<&indexmap::IndexMap<String, Value>>,
) -> Record {
    let mut record = Map::new();

    for (field_name, field_def) in &schema.fields {
        if let Some(value) = overrides.and_then(|o| o.get(field_name)) {
            record.insert(field_name.clone(), value.clone());
            continue;
        }

        let constraint = constraints.get(field_name);
        let value = generate_field_value(rng, field_name, field_def, constraint);
        record.insert(field_name.clone(), value);
    }

    record
}

/// Generate one field value from its definition plus request constraint.
pub fn generate_field_value(
    rng: &mut SmithRng,
    field_name: &str,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
) -> Value {
    match def.field_type {
        FieldType::String => generate_string(rng, field_name, def, constraint),
        FieldType::Integer => {
            let min = effective_min(def, constraint).unwrap_or(0.0) as i64;
            let max = effective_max(def, constraint).unwrap_or(100.0) as i64;
            numbers::generate_integer(rng, min, max).into()
        }
        FieldType::Float => {
            let min = effective_min(def, constraint).unwrap_or(0.0);
            let max = effective_max(def, constraint).unwrap_or(1000.0);
            numbers::generate_float(rng, min, max).into()
        }
        FieldType::Boolean => rng.chance(0.5).into(),
        FieldType::Date => datetime::generate_date(rng).into(),
        FieldType::Datetime => datetime::generate_datetime(rng).into(),
        FieldType::Email => internet::generate_email(rng).into(),
        FieldType::Phone => phone::generate_phone_number(rng).into(),
        FieldType::Address => address::generate_address(rng).into(),
        FieldType::Uuid => identifiers::generate_uuid(rng).into(),
        FieldType::Enum => generate_enum(rng, def, constraint),
        FieldType::Object => generate_object(rng, def),
        FieldType::Array => generate_array(rng, def),
        FieldType::Unknown => text::generate_title(rng, 1).to_lowercase().into(),
    }
}

fn effective_min(def: &FieldDef, constraint: Option<&FieldConstraint>) -> Option<f64> {
    constraint.and_then(|c| c.min).or(def.min)
}

fn effective_max(def: &FieldDef, constraint: Option<&FieldConstraint>) -> Option<f64> {
    constraint.and_then(|c| c.max).or(def.max)
}

fn generate_string(
    rng: &mut SmithRng,
    field_name: &str,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
) -> Value {
    let format = constraint
        .and_then(|c| c.format.as_deref())
        .or(def.format.as_deref());
    if let Some(template) = format {
        return identifiers::apply_format(rng, template).into();
    }

    let lower = field_name.to_lowercase();
    let value = if lower.contains("name") {
        if lower.contains("first") {
            names::generate_first_name(rng)
        } else if lower.contains("last") {
            names::generate_last_name(rng)
        } else {
            names::generate_name(rng)
        }
    } else if lower.contains("email") {
        internet::generate_email(rng)
    } else if lower.contains("phone") {
        phone::generate_phone_number(rng)
    } else if lower.contains("address") || lower.contains("street") {
        address::generate_street_address(rng)
    } else if lower.contains("city") {
        address::generate_city(rng)
    } else if lower.contains("state") {
        address::generate_state(rng)
    } else if lower.contains("zip") {
        address::generate_zip_code(rng)
    } else if lower.contains("country") {
        def.default
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or("US")
            .to_string()
    } else if lower.contains("title") {
        text::generate_title(rng, 6)
    } else if lower.contains("body") || lower.contains("description") {
        text::generate_paragraph(rng, 3)
    } else if lower.contains("sku") {
        identifiers::generate_sku(rng)
    } else if lower.contains("brand") || lower.contains("company") {
        rng.choose(crate::providers::data::BRANDS).to_string()
    } else {
        let min_length = constraint
            .and_then(|c| c.min_length)
            .or(def.min_length)
            .unwrap_or(5);
        let max_length = constraint
            .and_then(|c| c.max_length)
            .or(def.max_length)
            .unwrap_or(20);
        text::generate_bounded(rng, min_length, max_length)
    };

    value.into()
}

fn generate_enum(rng: &mut SmithRng, def: &FieldDef, constraint: Option<&FieldConstraint>) -> Value {
    let values: &[String] = match constraint {
        Some(c) if !c.enum_values.is_empty() => &c.enum_values,
        _ => &def.values,
    };

    if values.is_empty() {
        return "".into();
    }

    // Pick the declared default half the time when one exists.
    if let Some(default) = def.default.as_ref().and_then(Value::as_str) {
        if values.iter().any(|v| v == default) && rng.chance(0.5) {
            return default.into();
        }
    }

    rng.choose(values).clone().into()
}

fn generate_object(rng: &mut SmithRng, def: &FieldDef) -> Value {
    let mut obj = Map::new();
    for (nested_name, nested_def) in &def.fields {
        obj.insert(
            nested_name.clone(),
            generate_field_value(rng, nested_name, nested_def, None),
        );
    }
    Value::Object(obj)
}

fn generate_array(rng: &mut SmithRng, def: &FieldDef) -> Value {
    let length = rng.gen_range(ARRAY_LEN_RANGE.0, ARRAY_LEN_RANGE.1);
    let Some(item_def) = def.item_schema.as_deref() else {
        return Value::Array(Vec::new());
    };

    let items = (0..length)
        .map(|_| generate_field_value(rng, "item", item_def, None))
        .collect();
    Value::Array(items)
}
