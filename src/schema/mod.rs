//! Entity schema model.
//!
//! Schemas are documents: a name, a domain, an insertion-ordered field table,
//! and human-readable coherence rules that flow into LLM prompts. User
//! supplied inline schemas deserialize into the same types; the constraint
//! validator is the single source of truth for what a conforming record is.

mod builtin;
mod registry;

pub use builtin::builtin_schemas;
pub use registry::SchemaRegistry;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field data type.
///
/// Unknown type strings deserialize to [`FieldType::Unknown`] rather than
/// failing, so permissive inline schemas still load; the validator ignores
/// fields it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form string, possibly steered by field-name heuristics.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Floating point number, rendered to 2 decimals.
    Float,
    /// Boolean flag.
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// ISO-8601 timestamp.
    Datetime,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Postal address.
    Address,
    /// Version-4 UUID.
    Uuid,
    /// One of a fixed set of values.
    Enum,
    /// Nested object with its own field table.
    Object,
    /// Sequence of items sharing one item schema.
    Array,
    /// Anything else; ignored by validation.
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Wire name of the type, as it appears in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Address => "address",
            FieldType::Uuid => "uuid",
            FieldType::Enum => "enum",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Unknown => "unknown",
        }
    }
}

/// Definition of a single schema field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type; defaults to `string`.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Whether every record must carry this field.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description, surfaced in prompts and schema info.
    #[serde(default)]
    pub description: String,
    /// Format template such as `CRT-{year}-{random:7}`, or a named format
    /// like `iso8601`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Default value; enums pick it half the time when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Inclusive numeric minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive numeric maximum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Minimum string length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regex pattern, matched from the start of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Allowed values for enum fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Nested field table for object fields.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldDef>,
    /// Item definition for array fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<Box<FieldDef>>,
}

/// An entity schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema name, e.g. `cart`.
    pub name: String,
    /// Owning domain, e.g. `ecommerce`.
    pub domain: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Ordered field table; declaration order drives generation and prompt
    /// rendering.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDef>,
    /// Human-readable consistency rules, passed verbatim into prompts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coherence_rules: Vec<String>,
}

impl Schema {
    /// Minimal schema used when nothing resolvable was requested: the entity
    /// name with an empty field table.
    pub fn minimal(entity: &str, domain: &str) -> Self {
        Schema {
            name: if entity.is_empty() {
                "generic".to_string()
            } else {
                entity.to_string()
            },
            domain: if domain.is_empty() {
                "unknown".to_string()
            } else {
                domain.to_string()
            },
            ..Schema::default()
        }
    }

    /// Flattened per-field summary for the `GetSchemas` surface.
    pub fn info(&self) -> SchemaInfo {
        let fields = self
            .fields
            .iter()
            .map(|(name, def)| {
                let example = def
                    .format
                    .clone()
                    .or_else(|| def.default.as_ref().map(display_value))
                    .unwrap_or_default();
                SchemaFieldInfo {
                    name: name.clone(),
                    field_type: def.field_type.as_str().to_string(),
                    required: def.required,
                    description: def.description.clone(),
                    example,
                }
            })
            .collect();

        SchemaInfo {
            name: self.name.clone(),
            domain: self.domain.clone(),
            description: self.description.clone(),
            fields,
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Summary of one schema field, for schema listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFieldInfo {
    /// Field name.
    pub name: String,
    /// Wire name of the field type.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the field is required.
    pub required: bool,
    /// Field description.
    pub description: String,
    /// Example value derived from format template or default.
    pub example: String,
}

/// Summary of one schema, for schema listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Schema name.
    pub name: String,
    /// Owning domain.
    pub domain: String,
    /// Schema description.
    pub description: String,
    /// Per-field summaries in declaration order.
    pub fields: Vec<SchemaFieldInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_roundtrip() {
        for (name, ty) in [
            ("string", FieldType::String),
            ("integer", FieldType::Integer),
            ("datetime", FieldType::Datetime),
            ("enum", FieldType::Enum),
            ("array", FieldType::Array),
        ] {
            let parsed: FieldType = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(parsed, ty);
            assert_eq!(ty.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_field_type_does_not_fail() {
        let parsed: FieldType = serde_json::from_value(json!("geopoint")).unwrap();
        assert_eq!(parsed, FieldType::Unknown);
    }

    #[test]
    fn test_inline_schema_deserializes() {
        let doc = json!({
            "name": "widget",
            "domain": "testing",
            "description": "A widget",
            "fields": {
                "widget_id": {"type": "uuid", "required": true},
                "size": {"type": "integer", "min": 1, "max": 10},
                "tags": {
                    "type": "array",
                    "item_schema": {"type": "string"}
                }
            }
        });

        let schema: Schema = serde_json::from_value(doc).unwrap();
        assert_eq!(schema.name, "widget");
        assert_eq!(schema.fields.len(), 3);
        assert_eq!(schema.fields["widget_id"].field_type, FieldType::Uuid);
        assert!(schema.fields["tags"].item_schema.is_some());
        // Declaration order is preserved.
        let names: Vec<&String> = schema.fields.keys().collect();
        assert_eq!(names, ["widget_id", "size", "tags"]);
    }

    #[test]
    fn test_schema_info_examples() {
        let doc = json!({
            "name": "thing",
            "domain": "testing",
            "description": "",
            "fields": {
                "thing_id": {"type": "string", "format": "THG-{random:5}"},
                "currency": {"type": "enum", "values": ["USD"], "default": "USD"}
            }
        });
        let schema: Schema = serde_json::from_value(doc).unwrap();
        let info = schema.info();
        assert_eq!(info.fields[0].example, "THG-{random:5}");
        assert_eq!(info.fields[1].example, "USD");
    }

    #[test]
    fn test_minimal_schema() {
        let schema = Schema::minimal("cart", "ecommerce");
        assert_eq!(schema.name, "cart");
        assert!(schema.fields.is_empty());

        let fallback = Schema::minimal("", "");
        assert_eq!(fallback.name, "generic");
        assert_eq!(fallback.domain, "unknown");
    }
}
