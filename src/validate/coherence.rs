//! Coherence scoring for generated records.
//!
//! Grades a single record in `[0, 1]` on how internally consistent it is:
//! do the items belong together, are quantities plausible, does the
//! arithmetic balance, and are the timestamps in order. Carts and orders
//! have dedicated scoring; other entities get a neutral 0.7.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::providers::data::PRODUCT_GROUPS;

/// Timestamp fields considered for chronology checks.
const DATE_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "completed_at",
    "modified_at",
    "shipped_at",
];

/// Pure scorer over JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoherenceScorer;

impl CoherenceScorer {
    /// Score a record for its entity type. Returns a value in `[0, 1]`.
    pub fn score(&self, record: &Map<String, Value>, entity: &str) -> f64 {
        match entity {
            "cart" => self.score_cart(record),
            "order" => self.score_order(record),
            _ => 0.7,
        }
    }

    /// Score a cart: affinity 0.30, quantities 0.20, math 0.30, dates 0.20.
    pub fn score_cart(&self, cart: &Map<String, Value>) -> f64 {
        let items = items_of(cart);
        score_category_affinity(&items) * 0.30
            + score_quantities(&items) * 0.20
            + score_cart_math(cart) * 0.30
            + score_dates(cart) * 0.20
    }

    /// Score an order: affinity 0.25, quantities 0.15, math 0.30, dates 0.30.
    pub fn score_order(&self, order: &Map<String, Value>) -> f64 {
        let items = items_of(order);
        score_category_affinity(&items) * 0.25
            + score_quantities(&items) * 0.15
            + score_order_math(order) * 0.30
            + score_dates(order) * 0.30
    }
}

fn items_of(record: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    record
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

/// How well the items belong to one shopping occasion.
///
/// Partitions items against the affinity groups and takes the best group's
/// match ratio. Single-item carts score 1.0 by convention.
fn score_category_affinity(items: &[&Map<String, Value>]) -> f64 {
    if items.len() < 2 {
        return 1.0;
    }

    let item_names: Vec<String> = items
        .iter()
        .map(|item| {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("");
            let category = item.get("category").and_then(Value::as_str).unwrap_or("");
            if name.is_empty() { category } else { name }.to_lowercase()
        })
        .collect();

    let mut max_match = 0.0f64;
    for (_, group_items) in PRODUCT_GROUPS {
        let matches = item_names
            .iter()
            .filter(|name| {
                group_items
                    .iter()
                    .any(|g| name.contains(&g.to_lowercase()))
            })
            .count();
        max_match = max_match.max(matches as f64 / item_names.len() as f64);
    }

    if max_match >= 0.8 {
        1.0
    } else if max_match >= 0.5 {
        0.6
    } else if max_match >= 0.3 {
        0.4
    } else {
        0.2
    }
}

/// Mean plausibility of item quantities.
fn score_quantities(items: &[&Map<String, Value>]) -> f64 {
    if items.is_empty() {
        return 1.0;
    }

    let total: f64 = items
        .iter()
        .map(|item| {
            let qty = item.get("quantity").and_then(Value::as_i64).unwrap_or(1);
            match qty {
                1..=10 => 1.0,
                11..=20 => 0.7,
                q if q > 20 => 0.2,
                _ => 0.0,
            }
        })
        .sum();

    total / items.len() as f64
}

fn number(record: &Map<String, Value>, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Cart arithmetic: total should equal subtotal + tax.
fn score_cart_math(cart: &Map<String, Value>) -> f64 {
    let expected = number(cart, "subtotal") + number(cart, "tax");
    grade_total(number(cart, "total"), expected)
}

/// Order arithmetic: total should equal subtotal + tax + shipping - discount.
fn score_order_math(order: &Map<String, Value>) -> f64 {
    let expected = number(order, "subtotal") + number(order, "tax")
        + number(order, "shipping_cost")
        - number(order, "discount");
    grade_total(number(order, "total"), expected)
}

fn grade_total(total: f64, expected: f64) -> f64 {
    let diff = (total - expected).abs();
    if diff < 0.01 {
        1.0
    } else if diff < 1.0 {
        0.7
    } else {
        0.0
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z").map(|dt| dt.with_timezone(&Utc))
        })
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Chronology: created <= updated <= completed/shipped, 0.5 penalty per
/// violation, clamped at zero. Records without timestamps score 1.0.
fn score_dates(record: &Map<String, Value>) -> f64 {
    let mut dates = std::collections::HashMap::new();
    for field in DATE_FIELDS {
        if let Some(parsed) = record.get(*field).and_then(parse_timestamp) {
            dates.insert(*field, parsed);
        }
    }

    if dates.is_empty() {
        return 1.0;
    }

    let mut score = 1.0f64;
    let ordered_pairs = [
        ("created_at", "updated_at"),
        ("updated_at", "completed_at"),
        ("created_at", "shipped_at"),
    ];
    for (earlier, later) in ordered_pairs {
        if let (Some(a), Some(b)) = (dates.get(earlier), dates.get(later)) {
            if a > b {
                score -= 0.5;
            }
        }
    }

    score.max(0.0)
}
