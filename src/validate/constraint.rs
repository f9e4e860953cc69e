//! Recursive constraint validation.
//!
//! Checks a record against its schema's field definitions plus any
//! request-level constraints, collecting every violation instead of
//! stopping at the first so callers can present them all. Request-level
//! constraints override schema-level values on the same field.
//!
//! Regex semantics are match-from-start: a value conforms when the
//! earliest match begins at offset 0. Unknown field types are ignored.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::request::FieldConstraint;
use crate::schema::{FieldDef, FieldType, Schema};

/// One constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `items[2].quantity`.
    pub field_path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The offending value (`Null` for a missing field).
    pub value: Value,
}

/// Validate a record against a schema and request-level constraints.
///
/// Returns all violations; an empty vector means the record conforms.
pub fn validate_record(
    record: &Map<String, Value>,
    schema: &Schema,
    constraints: &IndexMap<String, FieldConstraint>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (field_name, field_def) in &schema.fields {
        let Some(value) = record.get(field_name) else {
            if field_def.required {
                errors.push(ValidationError {
                    field_path: field_name.clone(),
                    message: format!("required field '{field_name}' is missing"),
                    value: Value::Null,
                });
            }
            continue;
        };

        let constraint = constraints.get(field_name);
        validate_field(value, field_def, constraint, field_name, &mut errors);
    }

    errors
}

/// Validate a single value against its field definition.
pub fn validate_field(
    value: &Value,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    match def.field_type {
        FieldType::Integer => validate_integer(value, def, constraint, path, errors),
        FieldType::Float => validate_float(value, def, constraint, path, errors),
        FieldType::String => validate_string(value, def, constraint, path, errors),
        FieldType::Enum => validate_enum(value, def, constraint, path, errors),
        FieldType::Array => validate_array(value, def, path, errors),
        FieldType::Object => validate_object(value, def, path, errors),
        // Remaining types (boolean, date, email, ...) and unknown types
        // carry no checkable constraints here.
        _ => {}
    }
}

fn validate_integer(
    value: &Value,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    // JSON booleans are not integers even though some decoders coerce them.
    let n = match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => n.as_i64(),
        _ => None,
    };
    let Some(n) = n else {
        errors.push(type_error(path, "integer", value));
        return;
    };

    let min = constraint.and_then(|c| c.min).or(def.min);
    let max = constraint.and_then(|c| c.max).or(def.max);

    if let Some(min) = min {
        if (n as f64) < min {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("value {n} is less than minimum {min}"),
                value: value.clone(),
            });
        }
    }
    if let Some(max) = max {
        if (n as f64) > max {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("value {n} is greater than maximum {max}"),
                value: value.clone(),
            });
        }
    }
}

fn validate_float(
    value: &Value,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let Some(n) = value.as_f64() else {
        errors.push(type_error(path, "number", value));
        return;
    };

    let min = constraint.and_then(|c| c.min).or(def.min);
    let max = constraint.and_then(|c| c.max).or(def.max);

    if let Some(min) = min {
        if n < min {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("value {n} is less than minimum {min}"),
                value: value.clone(),
            });
        }
    }
    if let Some(max) = max {
        if n > max {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("value {n} is greater than maximum {max}"),
                value: value.clone(),
            });
        }
    }
}

fn validate_string(
    value: &Value,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let Some(s) = value.as_str() else {
        errors.push(type_error(path, "string", value));
        return;
    };
    let len = s.chars().count();

    let min_length = constraint.and_then(|c| c.min_length).or(def.min_length);
    let max_length = constraint.and_then(|c| c.max_length).or(def.max_length);

    if let Some(min) = min_length {
        if len < min {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("string length {len} is less than minimum {min}"),
                value: value.clone(),
            });
        }
    }
    if let Some(max) = max_length {
        if len > max {
            errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("string length {len} is greater than maximum {max}"),
                value: value.clone(),
            });
        }
    }

    let pattern = constraint
        .and_then(|c| c.regex.as_deref())
        .or(def.pattern.as_deref());
    if let Some(pattern) = pattern {
        match Regex::new(pattern) {
            Ok(re) => {
                let matches_from_start = re.find(s).is_some_and(|m| m.start() == 0);
                if !matches_from_start {
                    errors.push(ValidationError {
                        field_path: path.to_string(),
                        message: format!("string does not match pattern {pattern}"),
                        value: value.clone(),
                    });
                }
            }
            Err(e) => errors.push(ValidationError {
                field_path: path.to_string(),
                message: format!("invalid pattern {pattern}: {e}"),
                value: value.clone(),
            }),
        }
    }
}

fn validate_enum(
    value: &Value,
    def: &FieldDef,
    constraint: Option<&FieldConstraint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let allowed: &[String] = match constraint {
        Some(c) if !c.enum_values.is_empty() => &c.enum_values,
        _ => &def.values,
    };

    let matches = value
        .as_str()
        .map(|s| allowed.iter().any(|a| a == s))
        .unwrap_or(false);

    if !matches {
        errors.push(ValidationError {
            field_path: path.to_string(),
            message: format!("value {value} not in allowed values: {allowed:?}"),
            value: value.clone(),
        });
    }
}

fn validate_array(value: &Value, def: &FieldDef, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(items) = value.as_array() else {
        errors.push(type_error(path, "array", value));
        return;
    };

    let Some(item_def) = def.item_schema.as_deref() else {
        return;
    };

    for (idx, item) in items.iter().enumerate() {
        if item_def.field_type == FieldType::Object {
            for (nested_name, nested_def) in &item_def.fields {
                let nested_path = format!("{path}[{idx}].{nested_name}");
                match item.get(nested_name) {
                    Some(nested_value) => {
                        validate_field(nested_value, nested_def, None, &nested_path, errors);
                    }
                    None if nested_def.required => errors.push(ValidationError {
                        field_path: nested_path.clone(),
                        message: format!("required field '{nested_name}' is missing"),
                        value: Value::Null,
                    }),
                    None => {}
                }
            }
        } else {
            validate_field(item, item_def, None, &format!("{path}[{idx}]"), errors);
        }
    }
}

fn validate_object(value: &Value, def: &FieldDef, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(obj) = value.as_object() else {
        errors.push(type_error(path, "object", value));
        return;
    };

    for (nested_name, nested_def) in &def.fields {
        let nested_path = format!("{path}.{nested_name}");
        match obj.get(nested_name) {
            Some(nested_value) => {
                validate_field(nested_value, nested_def, None, &nested_path, errors);
            }
            None if nested_def.required => errors.push(ValidationError {
                field_path: nested_path,
                message: format!("required nested field '{nested_name}' is missing"),
                value: Value::Null,
            }),
            None => {}
        }
    }
}

fn type_error(path: &str, expected: &str, value: &Value) -> ValidationError {
    let got = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ValidationError {
        field_path: path.to_string(),
        message: format!("expected {expected}, got {got}"),
        value: value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(doc: serde_json::Value) -> Schema {
        serde_json::from_value(doc).unwrap()
    }

    fn record(doc: serde_json::Value) -> Map<String, Value> {
        doc.as_object().unwrap().clone()
    }

    fn no_constraints() -> IndexMap<String, FieldConstraint> {
        IndexMap::new()
    }

    #[test]
    fn test_valid_record_has_no_errors() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {
                "age": {"type": "integer", "min": 0, "max": 120, "required": true},
                "name": {"type": "string", "min_length": 1, "required": true}
            }
        }));
        let errors = validate_record(
            &record(json!({"age": 33, "name": "Ada"})),
            &schema,
            &no_constraints(),
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_missing_required_field() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"age": {"type": "integer", "required": true}}
        }));
        let errors = validate_record(&record(json!({})), &schema, &no_constraints());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, "age");
        assert_eq!(errors[0].value, Value::Null);
    }

    #[test]
    fn test_missing_optional_field_is_fine() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"note": {"type": "string", "required": false}}
        }));
        assert!(validate_record(&record(json!({})), &schema, &no_constraints()).is_empty());
    }

    #[test]
    fn test_boolean_is_not_an_integer() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"count": {"type": "integer"}}
        }));
        let errors = validate_record(
            &record(json!({"count": true})),
            &schema,
            &no_constraints(),
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("expected integer"));
    }

    #[test]
    fn test_float_accepts_integer_value() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"price": {"type": "float", "min": 0}}
        }));
        assert!(
            validate_record(&record(json!({"price": 10})), &schema, &no_constraints()).is_empty()
        );
    }

    #[test]
    fn test_integer_bounds_inclusive() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"rating": {"type": "integer", "min": 1, "max": 5}}
        }));
        assert!(
            validate_record(&record(json!({"rating": 1})), &schema, &no_constraints()).is_empty()
        );
        assert!(
            validate_record(&record(json!({"rating": 5})), &schema, &no_constraints()).is_empty()
        );
        let errors =
            validate_record(&record(json!({"rating": 6})), &schema, &no_constraints());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("greater than maximum"));
    }

    #[test]
    fn test_request_constraint_overrides_schema() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"qty": {"type": "integer", "min": 1, "max": 99}}
        }));
        let mut constraints = IndexMap::new();
        constraints.insert(
            "qty".to_string(),
            FieldConstraint {
                max: Some(10.0),
                ..FieldConstraint::default()
            },
        );
        let errors = validate_record(&record(json!({"qty": 50})), &schema, &constraints);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("maximum 10"));
    }

    #[test]
    fn test_string_length_counts_chars() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"title": {"type": "string", "max_length": 4}}
        }));
        // Four characters even though more bytes.
        assert!(validate_record(
            &record(json!({"title": "héllo".chars().take(4).collect::<String>()})),
            &schema,
            &no_constraints()
        )
        .is_empty());
    }

    #[test]
    fn test_pattern_prefix_match() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"code": {"type": "string", "pattern": "[A-Z]{3}-"}}
        }));
        assert!(validate_record(
            &record(json!({"code": "CRT-2025-123"})),
            &schema,
            &no_constraints()
        )
        .is_empty());

        // A match later in the string does not count.
        let errors = validate_record(
            &record(json!({"code": "xCRT-2025"})),
            &schema,
            &no_constraints(),
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("pattern"));
    }

    #[test]
    fn test_enum_values_and_override() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"status": {"type": "enum", "values": ["a", "b"]}}
        }));
        assert!(
            validate_record(&record(json!({"status": "a"})), &schema, &no_constraints())
                .is_empty()
        );

        let mut constraints = IndexMap::new();
        constraints.insert(
            "status".to_string(),
            FieldConstraint {
                enum_values: vec!["c".to_string()],
                ..FieldConstraint::default()
            },
        );
        // Request-level enum_values replaces the schema set.
        let errors = validate_record(&record(json!({"status": "a"})), &schema, &constraints);
        assert_eq!(errors.len(), 1);
        assert!(
            validate_record(&record(json!({"status": "c"})), &schema, &constraints).is_empty()
        );
    }

    #[test]
    fn test_array_item_paths() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {
                "items": {
                    "type": "array",
                    "item_schema": {
                        "type": "object",
                        "fields": {
                            "quantity": {"type": "integer", "min": 1, "required": true}
                        }
                    }
                }
            }
        }));
        let errors = validate_record(
            &record(json!({"items": [{"quantity": 2}, {"quantity": 0}]})),
            &schema,
            &no_constraints(),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, "items[1].quantity");
    }

    #[test]
    fn test_object_dotted_path_for_missing_required() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {
                "shipping_address": {
                    "type": "object",
                    "fields": {
                        "street": {"type": "string", "required": true},
                        "city": {"type": "string", "required": false}
                    }
                }
            }
        }));
        let errors = validate_record(
            &record(json!({"shipping_address": {"city": "Austin"}})),
            &schema,
            &no_constraints(),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, "shipping_address.street");
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {"geo": {"type": "geopoint"}}
        }));
        assert!(validate_record(
            &record(json!({"geo": {"lat": 1, "lon": 2}})),
            &schema,
            &no_constraints()
        )
        .is_empty());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let schema = schema(json!({
            "name": "t", "domain": "t", "description": "",
            "fields": {
                "a": {"type": "integer", "min": 10, "required": true},
                "b": {"type": "string", "min_length": 5, "required": true},
                "c": {"type": "enum", "values": ["x"], "required": true}
            }
        }));
        let errors = validate_record(
            &record(json!({"a": 1, "b": "hi", "c": "y"})),
            &schema,
            &no_constraints(),
        );
        assert_eq!(errors.len(), 3);
    }
}
