//! Prompt construction for LLM-driven generation.
//!
//! Selects a template family from the request shape, then interpolates the
//! formatted schema, constraints, scenario breakdown, and up to five
//! retrieval examples. Returns `(system_prompt, user_prompt)`.

pub mod templates;

use serde_json::Value;

use crate::request::{FieldConstraint, GenerateRequest, Scenario};
use crate::schema::Schema;
use indexmap::IndexMap;

/// Which template family a request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Boundary/defect-hunting data.
    EdgeCase,
    /// Carts and orders with affinity requirements.
    Coherent,
    /// Reviews and other prose-heavy entities.
    TextContent,
    /// Generation steered by retrieval examples.
    Rag,
    /// Everything else.
    General,
}

/// Builds system/user prompt pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Pick the template family for a request.
    pub fn select_template(
        &self,
        request: &GenerateRequest,
        rag_examples: Option<&[Value]>,
    ) -> TemplateKind {
        if request.defect_triggering || request.has_hint(&["edge_case", "defect"]) {
            return TemplateKind::EdgeCase;
        }

        if matches!(request.entity.as_str(), "cart" | "order")
            && request.has_hint(&["coherent", "realistic"])
        {
            return TemplateKind::Coherent;
        }

        if matches!(request.entity.as_str(), "review" | "comment" | "feedback") {
            return TemplateKind::TextContent;
        }

        if rag_examples.is_some_and(|e| !e.is_empty()) {
            return TemplateKind::Rag;
        }

        TemplateKind::General
    }

    /// Build the `(system, user)` prompt pair.
    pub fn build(
        &self,
        request: &GenerateRequest,
        schema: Option<&Schema>,
        rag_examples: Option<&[Value]>,
    ) -> (String, String) {
        let kind = self.select_template(request, rag_examples);
        let template = match kind {
            TemplateKind::EdgeCase => templates::EDGE_CASE_TEMPLATE,
            TemplateKind::Coherent => templates::COHERENT_TEMPLATE,
            TemplateKind::TextContent => templates::TEXT_CONTENT_TEMPLATE,
            TemplateKind::Rag => templates::RAG_TEMPLATE,
            TemplateKind::General => templates::GENERAL_TEMPLATE,
        };

        let examples = rag_examples.map(format_examples).unwrap_or_default();
        let context = if request.context.is_empty() {
            "No specific context provided.".to_string()
        } else {
            request.context.clone()
        };

        let user_prompt = template
            .replace("{count}", &request.count.to_string())
            .replace("{domain}", &request.domain)
            .replace("{entity_type}", &request.entity)
            .replace("{content_type}", &format!("{}s", request.entity))
            .replace("{context}", &context)
            .replace("{schema}", &format_schema(schema))
            .replace("{constraints}", &format_constraints(&request.constraints))
            .replace("{scenarios}", &format_scenarios(&request.scenarios))
            .replace("{rag_examples}", &examples)
            .replace("{defect_patterns}", &examples)
            .replace(
                "{sentiment_distribution}",
                "Mixed: 60% positive, 30% neutral, 10% negative",
            );

        (templates::SYSTEM_PROMPT.to_string(), user_prompt)
    }
}

/// Render a schema as a field list for prompt consumption.
fn format_schema(schema: Option<&Schema>) -> String {
    let Some(schema) = schema else {
        return "No specific schema provided. Generate data based on entity name and context."
            .to_string();
    };

    let mut lines = vec![
        format!("Entity: {}", schema.name),
        format!("Domain: {}", schema.domain),
        format!("Description: {}", schema.description),
        "\nFields:".to_string(),
    ];

    for (name, def) in &schema.fields {
        let required = if def.required { " (REQUIRED)" } else { "" };
        let mut line = format!("  - {}: {}{}", name, def.field_type.as_str(), required);
        if !def.description.is_empty() {
            line.push_str(&format!(" - {}", def.description));
        }
        if let Some(format) = &def.format {
            line.push_str(&format!(" (format: {format})"));
        }
        lines.push(line);

        // One level of nesting is enough for the model to infer shape.
        let nested = def
            .item_schema
            .as_deref()
            .map(|item| &item.fields)
            .unwrap_or(&def.fields);
        for (nested_name, nested_def) in nested {
            lines.push(format!(
                "    - {}: {}",
                nested_name,
                nested_def.field_type.as_str()
            ));
        }
    }

    if !schema.coherence_rules.is_empty() {
        lines.push("\nCoherence Rules:".to_string());
        for rule in &schema.coherence_rules {
            lines.push(format!("  - {rule}"));
        }
    }

    lines.join("\n")
}

fn format_constraints(constraints: &IndexMap<String, FieldConstraint>) -> String {
    if constraints.is_empty() {
        return "No specific constraints.".to_string();
    }

    let mut lines = Vec::with_capacity(constraints.len());
    for (field, c) in constraints {
        let mut parts = vec![format!("{field}:")];
        if let Some(min) = c.min {
            parts.push(format!("min={min}"));
        }
        if let Some(max) = c.max {
            parts.push(format!("max={max}"));
        }
        if let Some(min_length) = c.min_length {
            parts.push(format!("min_length={min_length}"));
        }
        if let Some(max_length) = c.max_length {
            parts.push(format!("max_length={max_length}"));
        }
        if !c.enum_values.is_empty() {
            parts.push(format!("values={:?}", c.enum_values));
        }
        if let Some(regex) = &c.regex {
            parts.push(format!("pattern={regex}"));
        }
        if let Some(format) = &c.format {
            parts.push(format!("format={format}"));
        }
        lines.push(format!("  - {}", parts.join(" ")));
    }
    lines.join("\n")
}

fn format_scenarios(scenarios: &[Scenario]) -> String {
    if scenarios.is_empty() {
        return "Generate all records with default scenario.".to_string();
    }

    let mut lines = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let mut parts = vec![format!("{}: {} records", scenario.name, scenario.count)];
        if !scenario.description.is_empty() {
            parts.push(format!("- {}", scenario.description));
        }
        if !scenario.overrides.is_empty() {
            let overrides = scenario
                .overrides
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("(overrides: {overrides})"));
        }
        lines.push(format!("  - {}", parts.join(" ")));
    }
    lines.join("\n")
}

/// Render up to five retrieval examples as pretty JSON.
fn format_examples(examples: &[Value]) -> String {
    if examples.is_empty() {
        return "No examples provided.".to_string();
    }

    let mut lines = Vec::new();
    for (i, example) in examples.iter().take(5).enumerate() {
        lines.push(format!("Example {}:", i + 1));
        lines.push(serde_json::to_string_pretty(example).unwrap_or_else(|_| example.to_string()));
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(entity: &str) -> GenerateRequest {
        GenerateRequest {
            request_id: "r1".to_string(),
            domain: "ecommerce".to_string(),
            entity: entity.to_string(),
            count: 5,
            ..GenerateRequest::default()
        }
    }

    #[test]
    fn test_edge_case_template_wins() {
        let builder = PromptBuilder;
        let mut req = request("cart");
        req.defect_triggering = true;
        req.hints = vec!["coherent".to_string()];
        assert_eq!(builder.select_template(&req, None), TemplateKind::EdgeCase);

        let mut req = request("user");
        req.hints = vec!["edge_case".to_string()];
        assert_eq!(builder.select_template(&req, None), TemplateKind::EdgeCase);
    }

    #[test]
    fn test_coherent_template_for_carts() {
        let builder = PromptBuilder;
        let mut req = request("cart");
        req.hints = vec!["realistic".to_string()];
        assert_eq!(builder.select_template(&req, None), TemplateKind::Coherent);

        // Without the hint, a cart is general.
        assert_eq!(
            builder.select_template(&request("cart"), None),
            TemplateKind::General
        );
    }

    #[test]
    fn test_text_content_template_for_reviews() {
        let builder = PromptBuilder;
        assert_eq!(
            builder.select_template(&request("review"), None),
            TemplateKind::TextContent
        );
    }

    #[test]
    fn test_rag_template_when_examples_present() {
        let builder = PromptBuilder;
        let examples = vec![json!({"a": 1})];
        assert_eq!(
            builder.select_template(&request("user"), Some(&examples)),
            TemplateKind::Rag
        );
        assert_eq!(
            builder.select_template(&request("user"), Some(&[])),
            TemplateKind::General
        );
    }

    #[test]
    fn test_build_interpolates_request() {
        let builder = PromptBuilder;
        let mut req = request("user");
        req.context = "new loyalty members".to_string();
        let schema: Schema = serde_json::from_value(json!({
            "name": "user", "domain": "ecommerce", "description": "Account",
            "fields": {
                "email": {"type": "email", "required": true, "description": "Login email"}
            },
            "coherence_rules": ["last_login >= created_at"]
        }))
        .unwrap();

        let (system, user) = builder.build(&req, Some(&schema), None);
        assert!(system.contains("_scenario"));
        assert!(system.contains("_index"));
        assert!(user.contains("Generate 5 test data records"));
        assert!(user.contains("new loyalty members"));
        assert!(user.contains("email: email (REQUIRED) - Login email"));
        assert!(user.contains("last_login >= created_at"));
        assert!(user.contains("No specific constraints."));
    }

    #[test]
    fn test_build_without_schema() {
        let builder = PromptBuilder;
        let (_, user) = builder.build(&request("widget"), None, None);
        assert!(user.contains("No specific schema provided."));
    }

    #[test]
    fn test_examples_limited_to_five() {
        let examples: Vec<Value> = (0..8).map(|i| json!({"n": i})).collect();
        let rendered = format_examples(&examples);
        assert!(rendered.contains("Example 5:"));
        assert!(!rendered.contains("Example 6:"));
    }

    #[test]
    fn test_scenarios_rendered_with_overrides() {
        let mut req = request("order");
        let mut overrides = IndexMap::new();
        overrides.insert("status".to_string(), json!("cancelled"));
        req.scenarios = vec![Scenario {
            name: "cancelled".to_string(),
            count: 3,
            description: "orders cancelled before shipping".to_string(),
            overrides,
        }];

        let rendered = format_scenarios(&req.scenarios);
        assert!(rendered.contains("cancelled: 3 records"));
        assert!(rendered.contains("orders cancelled before shipping"));
        assert!(rendered.contains("status=\"cancelled\""));
    }
}
