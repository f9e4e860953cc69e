//! Prompt template text.
//!
//! Placeholders (`{count}`, `{schema}`, ...) are interpolated by the
//! builder. The system prompt carries the output contract every template
//! relies on: a JSON array of objects, each with `_scenario` and `_index`,
//! and nothing else.

/// Persona and output contract shared by all templates.
pub const SYSTEM_PROMPT: &str = "You are a Test Data Generation Agent for retail systems.

YOUR ROLE:
Generate realistic, coherent test data that accurately simulates real-world retail scenarios. Your data will be used for automated testing of eCommerce, supply chain, loyalty, mobile, marketing, store operations, and enterprise systems.

CORE PRINCIPLES:
1. COHERENCE: Related fields must make sense together. A shopping cart should contain items a real customer would buy together (running shoes + athletic socks), not random products.
2. REALISM: Names, addresses, emails, and text should look authentic. Use realistic patterns, not 'test123' or 'John Doe'.
3. VALIDITY: All generated data must conform to the provided schema and constraints. Respect min/max, enum values, regex patterns, and data types.
4. DIVERSITY: Generate varied data within constraints. Don't repeat the same patterns across records.
5. EDGE CASES: When requested, include boundary values, special characters, and scenarios known to cause issues.

OUTPUT RULES:
- Always respond with valid JSON only. No markdown, no explanations, no preamble.
- Output must be a JSON array of objects matching the schema.
- Include a '_scenario' field in each record indicating which scenario it belongs to.
- Include a '_index' field with sequential numbering starting from 0.

DOMAIN KNOWLEDGE:
- The catalog spans apparel, accessories, home goods, beauty products, and jewelry
- Payment methods: Credit cards, PayPal, Apple Pay, Google Pay, store card, gift cards
- Loyalty program tiers: Bronze, Silver, Gold, Platinum
- Shipping: Standard (5-7 days), Express (2-3 days), Same Day (select markets)
- Store pickup: BOPIS (Buy Online Pick up In Store)";

/// Default template for schema-driven generation.
pub const GENERAL_TEMPLATE: &str = "Generate {count} test data records for the {domain} domain.

CONTEXT:
{context}

SCHEMA:
{schema}

CONSTRAINTS:
{constraints}

SCENARIOS:
{scenarios}

Generate exactly {count} records distributed across the scenarios as specified. Output valid JSON array only.";

/// Template used when retrieval examples are available.
pub const RAG_TEMPLATE: &str = "Generate {count} test data records for the {domain} domain.

CONTEXT:
{context}

REFERENCE EXAMPLES (from similar successful test data):
Study these examples to understand the expected patterns and quality:
{rag_examples}

SCHEMA:
{schema}

CONSTRAINTS:
{constraints}

Generate data that matches the quality and patterns shown in the examples while conforming to the schema. Output valid JSON array only.";

/// Template for boundary/defect-hunting data.
pub const EDGE_CASE_TEMPLATE: &str = "Generate {count} EDGE CASE test data records designed to stress-test the system.

CONTEXT:
{context}

HISTORICAL DEFECT PATTERNS (from past bugs):
These data patterns have caused bugs before. Generate similar data to catch regressions:
{defect_patterns}

EDGE CASES TO INCLUDE:
- Boundary values (min, max, just above/below limits)
- Special characters (unicode, emojis, SQL injection patterns)
- Empty/null values where allowed
- Timezone edge cases (midnight, DST boundaries)
- Very long strings at max length
- Decimal precision edge cases

SCHEMA:
{schema}

Each record should target a specific edge case. Include '_edge_case_type' field describing what edge case it tests. Output valid JSON array only.";

/// Template for coherent carts and orders.
pub const COHERENT_TEMPLATE: &str = "Generate a COHERENT {entity_type} with logically related items.

CONTEXT:
{context}

COHERENCE REQUIREMENTS:
- Items must logically belong together (what a real customer would buy)
- Consider: shopping occasion, category affinity, complementary products
- Amounts must be mathematically consistent (subtotal + tax = total)
- Dates must be chronologically valid (created < modified < completed)

COHERENT SET EXAMPLES:
- Fitness: Running shoes + Athletic socks + Water bottle + Fitness tracker
- Date night: Dress + Heels + Clutch + Jewelry
- Home refresh: Bedding set + Pillows + Throw blanket + Candles
- Baby shower gift: Onesies + Blanket + Stuffed animal + Card

SCHEMA:
{schema}

Include '_shopping_occasion' field describing the coherent theme. Output valid JSON only.";

/// Template for reviews, comments, and other text-heavy entities.
pub const TEXT_CONTENT_TEMPLATE: &str = "Generate {count} realistic {content_type} entries.

CONTEXT:
{context}

TEXT QUALITY REQUIREMENTS:
- Write like a real customer, not a marketer or AI
- Include natural imperfections (casual grammar, abbreviations)
- Vary length and detail level across entries
- Reference specific product attributes when relevant
- Include emotional language where appropriate

SENTIMENT DISTRIBUTION:
{sentiment_distribution}

SCHEMA:
{schema}

Include '_sentiment' field (positive/negative/neutral). Output valid JSON array only.";

/// Addendum appended to the user prompt after a parse failure.
pub const STRICT_JSON_ADDENDUM: &str = "
IMPORTANT: Output ONLY valid JSON array, no other text.

Example format:
[
  {
    \"field1\": \"value1\",
    \"field2\": 123,
    \"_scenario\": \"default\",
    \"_index\": 0
  },
  {
    \"field1\": \"value2\",
    \"field2\": 456,
    \"_scenario\": \"default\",
    \"_index\": 1
  }
]

Do not include markdown code blocks, explanations, or any other text. Only the JSON array.
";
