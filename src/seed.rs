//! Corpus seeding.
//!
//! Populates the three vector store collections with starter patterns so
//! the retrieval paths have something to draw from on a fresh deployment:
//! curated coherent carts/orders/users/reviews, defect-triggering payloads
//! from known past bugs, and anonymized production distributions.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::vector::{Collection, VectorStore};
use crate::error::{Error, Result};

/// Curated test-data patterns.
pub fn test_data_patterns() -> Vec<Value> {
    vec![
        json!({
            "domain": "ecommerce",
            "entity": "cart",
            "scenario": "fitness_shopping",
            "data": {
                "cart_id": "CRT-2025-1234567",
                "customer_id": "USR-9876543",
                "items": [
                    {"sku": "FIT-RUN-001", "name": "Running Shoes", "quantity": 1, "price": 129.99},
                    {"sku": "FIT-SOC-002", "name": "Athletic Socks", "quantity": 3, "price": 12.99},
                    {"sku": "FIT-BOT-003", "name": "Water Bottle", "quantity": 1, "price": 24.99}
                ],
                "subtotal": 193.95,
                "tax": 15.52,
                "total": 209.47,
                "created_at": "2025-01-15T10:30:00"
            },
            "quality_score": 0.95
        }),
        json!({
            "domain": "ecommerce",
            "entity": "cart",
            "scenario": "beauty_shopping",
            "data": {
                "cart_id": "CRT-2025-2345678",
                "customer_id": "USR-1122334",
                "items": [
                    {"sku": "BEA-LIP-001", "name": "Lipstick", "quantity": 2, "price": 22.00},
                    {"sku": "BEA-MAS-002", "name": "Mascara", "quantity": 1, "price": 28.00},
                    {"sku": "BEA-FOU-003", "name": "Foundation", "quantity": 1, "price": 42.00}
                ],
                "subtotal": 114.00,
                "tax": 9.12,
                "total": 123.12,
                "created_at": "2025-01-16T14:20:00"
            },
            "quality_score": 0.92
        }),
        json!({
            "domain": "ecommerce",
            "entity": "order",
            "scenario": "standard_order",
            "data": {
                "order_id": "ORD-2025-3456789",
                "customer_id": "USR-5544332",
                "status": "shipped",
                "items": [
                    {"sku": "APP-TEE-001", "name": "T-Shirt", "quantity": 2, "price": 19.99},
                    {"sku": "APP-JEA-002", "name": "Jeans", "quantity": 1, "price": 59.99}
                ],
                "subtotal": 99.97,
                "tax": 8.00,
                "shipping_cost": 5.99,
                "total": 113.96,
                "created_at": "2025-01-10T09:15:00",
                "shipped_at": "2025-01-11T16:30:00"
            },
            "quality_score": 0.90
        }),
        json!({
            "domain": "ecommerce",
            "entity": "user",
            "scenario": "platinum_member",
            "data": {
                "user_id": "USR-7788990",
                "email": "sarah.johnson@example.com",
                "first_name": "Sarah",
                "last_name": "Johnson",
                "phone": "(555) 234-5678",
                "loyalty_tier": "platinum",
                "created_at": "2023-03-15T10:00:00",
                "last_login": "2025-01-16T08:45:00"
            },
            "quality_score": 0.88
        }),
        json!({
            "domain": "ecommerce",
            "entity": "review",
            "scenario": "positive_review",
            "data": {
                "review_id": "REV-1234567890",
                "product_id": "PROD-123456",
                "user_id": "USR-9988776",
                "rating": 5,
                "title": "Excellent quality, highly recommend!",
                "body": "This product exceeded my expectations. Great quality, fast shipping, and exactly as described. Would definitely purchase again!",
                "verified_purchase": true,
                "helpful_votes": 15,
                "created_at": "2025-01-14T19:30:00"
            },
            "quality_score": 0.93
        }),
    ]
}

/// Defect-triggering patterns from known past bugs.
pub fn defect_patterns() -> Vec<Value> {
    vec![
        json!({
            "defect_id": "BUG-2024-001",
            "domain": "ecommerce",
            "entity": "cart",
            "trigger_data": {
                "cart_id": "CRT-2024-0000000",
                "customer_id": "USR-0000000",
                "items": [],
                "subtotal": 0.00,
                "tax": 0.00,
                "total": 0.00
            },
            "defect_description": "Empty cart array caused null pointer exception in checkout flow",
            "severity": "high"
        }),
        json!({
            "defect_id": "BUG-2024-002",
            "domain": "ecommerce",
            "entity": "payment",
            "trigger_data": {
                "payment_id": "PAY-2024-1111111",
                "amount": 0.001,
                "currency": "USD",
                "status": "completed"
            },
            "defect_description": "Very small decimal amounts (< 0.01) caused rounding errors in payment processing",
            "severity": "medium"
        }),
        json!({
            "defect_id": "BUG-2024-003",
            "domain": "ecommerce",
            "entity": "user",
            "trigger_data": {
                "user_id": "USR-2222222",
                "email": "test+special@example.com",
                "first_name": "José",
                "last_name": "O'Brien"
            },
            "defect_description": "Special characters in email and name fields caused validation failures",
            "severity": "medium"
        }),
        json!({
            "defect_id": "BUG-2024-004",
            "domain": "ecommerce",
            "entity": "order",
            "trigger_data": {
                "order_id": "ORD-2024-3333333",
                "created_at": "2024-12-31T23:59:59Z",
                "updated_at": "2025-01-01T00:00:01Z",
                "status": "pending"
            },
            "defect_description": "Timezone edge case at year boundary caused date comparison failures",
            "severity": "low"
        }),
        json!({
            "defect_id": "BUG-2024-005",
            "domain": "ecommerce",
            "entity": "cart",
            "trigger_data": {
                "cart_id": "CRT-2024-4444444",
                "items": [
                    {"sku": "TST-001", "name": "'; DROP TABLE carts; --", "quantity": 1, "price": 10.00}
                ],
                "subtotal": 10.00
            },
            "defect_description": "SQL injection pattern in product name field was not properly sanitized",
            "severity": "critical"
        }),
    ]
}

/// Anonymized production distribution samples.
pub fn production_samples() -> Vec<Value> {
    vec![
        json!({
            "domain": "ecommerce",
            "entity": "cart",
            "anonymized_data": {
                "cart_id": "CRT-ANON-001",
                "item_count": 3,
                "avg_item_price": 45.67,
                "total_range": "100-200",
                "categories": ["apparel", "accessories"]
            },
            "distribution_stats": {
                "avg_items_per_cart": 3.2,
                "median_total": 145.00,
                "p95_total": 450.00,
                "common_categories": ["apparel", "home", "beauty"]
            }
        }),
        json!({
            "domain": "ecommerce",
            "entity": "order",
            "anonymized_data": {
                "order_id": "ORD-ANON-001",
                "status_distribution": {
                    "pending": 0.15,
                    "processing": 0.25,
                    "shipped": 0.45,
                    "delivered": 0.15
                },
                "avg_processing_time_hours": 24
            },
            "distribution_stats": {
                "avg_order_value": 125.50,
                "median_shipping_cost": 5.99,
                "express_shipping_rate": 0.35
            }
        }),
    ]
}

/// Seed all three collections. Existing collections are left in place;
/// patterns are appended.
pub async fn run(store: Arc<dyn VectorStore>) -> Result<()> {
    tracing::info!("seed_starting");
    store.connect().await.map_err(Error::from)?;

    let result = seed_all(store.as_ref()).await;
    store.disconnect().await;
    result
}

async fn seed_all(store: &dyn VectorStore) -> Result<()> {
    for (collection, patterns) in [
        (Collection::Patterns, test_data_patterns()),
        (Collection::Defects, defect_patterns()),
        (Collection::Production, production_samples()),
    ] {
        let count = patterns.len();
        store
            .batch_insert(collection, patterns)
            .await
            .map_err(Error::from)?;
        let total = store.count(collection).await.map_err(Error::from)?;
        tracing::info!(
            collection = collection.name(),
            inserted = count,
            total,
            "seed_collection_complete"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::MemoryVectorStore;

    #[tokio::test]
    async fn test_seed_populates_all_collections() {
        let store = Arc::new(MemoryVectorStore::new());
        run(store.clone()).await.unwrap();

        assert_eq!(store.count(Collection::Patterns).await.unwrap(), 5);
        assert_eq!(store.count(Collection::Defects).await.unwrap(), 5);
        assert_eq!(store.count(Collection::Production).await.unwrap(), 2);
        assert_eq!(store.session_counts(), (1, 1));
    }

    #[test]
    fn test_seeded_cart_math_is_consistent() {
        for pattern in test_data_patterns() {
            let Some(data) = pattern.get("data") else {
                continue;
            };
            let (Some(subtotal), Some(tax), Some(total)) = (
                data["subtotal"].as_f64(),
                data["tax"].as_f64(),
                data["total"].as_f64(),
            ) else {
                continue;
            };
            let shipping = data["shipping_cost"].as_f64().unwrap_or(0.0);
            assert!(
                (subtotal + tax + shipping - total).abs() < 0.011,
                "inconsistent totals in {}",
                data["cart_id"].as_str().or(data["order_id"].as_str()).unwrap_or("?")
            );
        }
    }

    #[tokio::test]
    async fn test_reseed_after_collection_drop() {
        let store = Arc::new(MemoryVectorStore::new());
        run(store.clone()).await.unwrap();

        store.delete_collection(Collection::Defects).await.unwrap();
        assert!(!store.exists(Collection::Defects).await.unwrap());

        run(store.clone()).await.unwrap();
        assert_eq!(store.count(Collection::Defects).await.unwrap(), 5);
        // Untouched collections keep accumulating.
        assert_eq!(store.count(Collection::Patterns).await.unwrap(), 10);
    }

    #[test]
    fn test_defect_patterns_carry_trigger_data() {
        for pattern in defect_patterns() {
            assert!(pattern.get("trigger_data").is_some());
            assert!(pattern.get("defect_description").is_some());
        }
    }
}
