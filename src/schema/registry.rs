//! Process-wide schema registry.
//!
//! Seeded with the built-in entities at construction. Reads are frequent and
//! cheap (shared lock over an ordered map of `Arc`s); writes only happen when
//! a request registers an inline schema, which persists for the process
//! lifetime and must be unique by name.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{builtin_schemas, Schema, SchemaInfo};

/// Name -> schema mapping shared by the whole process.
pub struct SchemaRegistry {
    schemas: RwLock<IndexMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Create a registry seeded with the built-in entity schemas.
    pub fn new() -> Self {
        let mut schemas = IndexMap::new();
        for schema in builtin_schemas() {
            schemas.insert(schema.name.clone(), Arc::new(schema));
        }
        tracing::info!(schema_count = schemas.len(), "schema_registry_initialized");
        Self {
            schemas: RwLock::new(schemas),
        }
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        let guard = self.schemas.read().unwrap_or_else(|e| e.into_inner());
        guard.get(name).cloned()
    }

    /// Whether a schema with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        let guard = self.schemas.read().unwrap_or_else(|e| e.into_inner());
        guard.contains_key(name)
    }

    /// All schemas in registration order, optionally filtered by domain.
    pub fn list(&self, domain: Option<&str>) -> Vec<Arc<Schema>> {
        let guard = self.schemas.read().unwrap_or_else(|e| e.into_inner());
        guard
            .values()
            .filter(|s| domain.is_none_or(|d| s.domain == d))
            .cloned()
            .collect()
    }

    /// Register a new schema.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when `name` or `domain` is empty; `SchemaExists` on a
    /// duplicate name.
    pub fn register(&self, schema: Schema) -> Result<()> {
        validate_structure(&schema)?;

        let mut guard = self.schemas.write().unwrap_or_else(|e| e.into_inner());
        if guard.contains_key(&schema.name) {
            return Err(Error::SchemaExists(schema.name));
        }
        tracing::info!(name = %schema.name, "schema_registered");
        guard.insert(schema.name.clone(), Arc::new(schema));
        Ok(())
    }

    /// Parse a JSON document and register it.
    ///
    /// The document must carry `name`, `domain`, `description`, and a
    /// `fields` mapping.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` on structural problems, `SchemaExists` on duplicates.
    pub fn register_document(&self, document: &Value) -> Result<()> {
        for key in ["name", "domain", "description", "fields"] {
            if document.get(key).is_none() {
                return Err(Error::InvalidSchema(format!(
                    "schema missing required key: {key}"
                )));
            }
        }
        if !document["fields"].is_object() {
            return Err(Error::InvalidSchema(
                "schema 'fields' must be a mapping".to_string(),
            ));
        }

        let schema: Schema = serde_json::from_value(document.clone())
            .map_err(|e| Error::InvalidSchema(e.to_string()))?;
        self.register(schema)
    }

    /// Flattened info for one schema, or `None` when absent.
    pub fn info(&self, name: &str) -> Option<SchemaInfo> {
        self.get(name).map(|s| s.info())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_structure(schema: &Schema) -> Result<()> {
    if schema.name.is_empty() {
        return Err(Error::InvalidSchema("schema 'name' cannot be empty".into()));
    }
    if schema.domain.is_empty() {
        return Err(Error::InvalidSchema(
            "schema 'domain' cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_are_loaded() {
        let registry = SchemaRegistry::new();
        for name in ["cart", "order", "payment", "product", "review", "user"] {
            assert!(registry.exists(name), "missing builtin: {name}");
        }
    }

    #[test]
    fn test_get_returns_none_for_unknown() {
        let registry = SchemaRegistry::new();
        assert!(registry.get("spaceship").is_none());
    }

    #[test]
    fn test_list_filters_by_domain() {
        let registry = SchemaRegistry::new();
        let all = registry.list(None);
        let ecommerce = registry.list(Some("ecommerce"));
        let none = registry.list(Some("aviation"));

        assert!(!all.is_empty());
        assert_eq!(all.len(), ecommerce.len());
        assert!(none.is_empty());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let registry = SchemaRegistry::new();
        let schema = Schema {
            name: "cart".to_string(),
            domain: "ecommerce".to_string(),
            ..Schema::default()
        };
        assert!(matches!(
            registry.register(schema),
            Err(Error::SchemaExists(_))
        ));
    }

    #[test]
    fn test_register_document() {
        let registry = SchemaRegistry::new();
        let doc = json!({
            "name": "widget",
            "domain": "testing",
            "description": "A widget",
            "fields": {
                "widget_id": {"type": "uuid", "required": true}
            }
        });

        registry.register_document(&doc).unwrap();
        assert!(registry.exists("widget"));
        let info = registry.info("widget").unwrap();
        assert_eq!(info.fields.len(), 1);
        assert_eq!(info.fields[0].field_type, "uuid");
    }

    #[test]
    fn test_register_document_missing_key() {
        let registry = SchemaRegistry::new();
        let doc = json!({"name": "nofields", "domain": "testing"});
        let err = registry.register_document(&doc).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_register_document_fields_not_mapping() {
        let registry = SchemaRegistry::new();
        let doc = json!({
            "name": "badfields",
            "domain": "testing",
            "description": "",
            "fields": ["not", "a", "mapping"]
        });
        assert!(matches!(
            registry.register_document(&doc),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_registered_schema_persists() {
        let registry = SchemaRegistry::new();
        let doc = json!({
            "name": "session",
            "domain": "testing",
            "description": "",
            "fields": {}
        });
        registry.register_document(&doc).unwrap();

        // Second registration with the same name is an error.
        assert!(matches!(
            registry.register_document(&doc),
            Err(Error::SchemaExists(_))
        ));
    }
}
