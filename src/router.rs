//! Intelligence router: picks a generation path per request.
//!
//! Pure function from request to decision. Priority order: explicit method,
//! hybrid, retrieval, LLM, synthetic. The decision's `reason` summarizes
//! which rules fired and is logged and echoed in response metadata.

use crate::request::{GenerateRequest, GenerationMethod};

/// The backend a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    /// Deterministic schema-driven generation.
    Synthetic,
    /// Language-model generation.
    Llm,
    /// Pattern retrieval.
    Retrieval,
    /// Retrieval feeding the language model.
    Hybrid,
}

impl Path {
    /// Path name as reported in metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Path::Synthetic => "synthetic",
            Path::Llm => "llm",
            Path::Retrieval => "retrieval",
            Path::Hybrid => "hybrid",
        }
    }
}

/// Result of routing a request.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Chosen backend.
    pub path: Path,
    /// Human-readable summary of the rules that fired.
    pub reason: String,
    /// Confidence in the choice, 0.0 to 1.0.
    pub confidence: f64,
}

/// Routes generation requests to the optimal generation path.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntelligenceRouter;

impl IntelligenceRouter {
    /// Determine the best generation path for a request.
    pub fn route(&self, request: &GenerateRequest) -> RoutingDecision {
        // Priority 0: an explicit method is honoured verbatim.
        if request.generation_method != GenerationMethod::Auto {
            let path = match request.generation_method {
                GenerationMethod::Synthetic => Path::Synthetic,
                GenerationMethod::Llm => Path::Llm,
                GenerationMethod::Retrieval => Path::Retrieval,
                GenerationMethod::Hybrid => Path::Hybrid,
                GenerationMethod::Auto => unreachable!(),
            };
            return RoutingDecision {
                path,
                reason: format!(
                    "user explicitly selected {} generation method",
                    path.as_str()
                ),
                confidence: 1.0,
            };
        }

        if self.should_use_hybrid(request) {
            return RoutingDecision {
                path: Path::Hybrid,
                reason: "complex request with historical patterns and intelligence needed"
                    .to_string(),
                confidence: 0.9,
            };
        }

        if self.should_use_retrieval(request) {
            return RoutingDecision {
                path: Path::Retrieval,
                reason: self.retrieval_reason(request),
                confidence: 0.85,
            };
        }

        if self.should_use_llm(request) {
            return RoutingDecision {
                path: Path::Llm,
                reason: self.llm_reason(request),
                confidence: 0.8,
            };
        }

        RoutingDecision {
            path: Path::Synthetic,
            reason: self.synthetic_reason(request),
            confidence: 0.95,
        }
    }

    fn should_use_hybrid(&self, request: &GenerateRequest) -> bool {
        if self.should_use_retrieval(request) && self.should_use_llm(request) {
            return true;
        }

        // Many scenarios combined with historical bias also warrant hybrid.
        request.scenarios.len() > 2 && (request.learn_from_history || request.production_like)
    }

    fn should_use_retrieval(&self, request: &GenerateRequest) -> bool {
        request.learn_from_history
            || request.defect_triggering
            || request.production_like
            || request.has_hint(&["similar", "pattern", "historical", "production"])
    }

    fn should_use_llm(&self, request: &GenerateRequest) -> bool {
        if request.context.len() > 10 {
            return true;
        }

        if matches!(request.entity.as_str(), "cart" | "order")
            && request.has_hint(&["coherent", "realistic"])
        {
            return true;
        }

        if matches!(
            request.entity.as_str(),
            "review" | "comment" | "feedback" | "description"
        ) {
            return true;
        }

        if request.has_hint(&["realistic", "coherent", "intelligent", "natural"]) {
            return true;
        }

        request
            .scenarios
            .iter()
            .any(|s| s.description.len() > 20)
    }

    fn retrieval_reason(&self, request: &GenerateRequest) -> String {
        let mut reasons = Vec::new();
        if request.learn_from_history {
            reasons.push("learn_from_history flag set".to_string());
        }
        if request.defect_triggering {
            reasons.push("defect_triggering mode requested".to_string());
        }
        if request.production_like {
            reasons.push("production-like distributions needed".to_string());
        }
        if request.has_hint(&["similar", "pattern", "historical", "production"]) {
            reasons.push(format!(
                "hints suggest pattern matching: {:?}",
                request.lowered_hints()
            ));
        }

        if reasons.is_empty() {
            "retrieval: pattern-based generation".to_string()
        } else {
            format!("retrieval: {}", reasons.join(", "))
        }
    }

    fn llm_reason(&self, request: &GenerateRequest) -> String {
        let mut reasons = Vec::new();
        if !request.context.is_empty() {
            reasons.push("context provided".to_string());
        }
        if matches!(request.entity.as_str(), "cart" | "order") {
            reasons.push(format!("coherence needed for {}", request.entity));
        }
        if matches!(request.entity.as_str(), "review" | "comment" | "feedback") {
            reasons.push(format!("text content generation for {}", request.entity));
        }
        if request.has_hint(&["realistic", "coherent", "intelligent", "natural"]) {
            reasons.push(format!(
                "intelligent generation requested via hints: {:?}",
                request.lowered_hints()
            ));
        }
        if request.scenarios.iter().any(|s| !s.description.is_empty()) {
            reasons.push("detailed scenario descriptions provided".to_string());
        }

        if reasons.is_empty() {
            "llm: intelligent generation".to_string()
        } else {
            format!("llm: {}", reasons.join(", "))
        }
    }

    fn synthetic_reason(&self, request: &GenerateRequest) -> String {
        let mut reasons = Vec::new();
        if request.context.is_empty() {
            reasons.push("no context provided".to_string());
        }
        if request.count > 500 {
            reasons.push(format!("high volume ({} records)", request.count));
        }
        if request.has_hint(&["fast"]) {
            reasons.push("fast generation requested".to_string());
        }
        if matches!(request.entity.as_str(), "user" | "payment")
            && !request.has_hint(&["realistic", "coherent"])
        {
            reasons.push(format!("simple entity ({})", request.entity));
        }

        if reasons.is_empty() {
            "synthetic: default fast generation".to_string()
        } else {
            format!("synthetic: {}", reasons.join(", "))
        }
    }
}
