//! Built-in retail entity schemas.
//!
//! Loaded once at registry construction. Documents are authored as JSON so
//! they read the same as user-supplied inline schemas.

use serde_json::json;

use crate::schema::Schema;

fn parse(doc: serde_json::Value) -> Schema {
    serde_json::from_value(doc).expect("builtin schema is well-formed")
}

/// The built-in entity schemas: cart, order, payment, product, review, user.
pub fn builtin_schemas() -> Vec<Schema> {
    vec![cart(), order(), payment(), product(), review(), user()]
}

fn cart() -> Schema {
    parse(json!({
        "name": "cart",
        "domain": "ecommerce",
        "description": "Shopping cart with items",
        "fields": {
            "cart_id": {
                "type": "string",
                "format": "CRT-{year}-{random:7}",
                "required": true,
                "description": "Unique cart identifier"
            },
            "customer_id": {
                "type": "string",
                "format": "USR-{random:7}",
                "required": true,
                "description": "Customer who owns the cart"
            },
            "items": {
                "type": "array",
                "required": true,
                "description": "Items in the cart",
                "item_schema": {
                    "type": "object",
                    "fields": {
                        "sku": {"type": "string", "required": true, "description": "Product SKU"},
                        "name": {"type": "string", "required": true, "description": "Product name"},
                        "quantity": {"type": "integer", "min": 1, "max": 99, "required": true, "description": "Quantity"},
                        "price": {"type": "float", "min": 0.01, "required": true, "description": "Unit price"},
                        "category": {"type": "string", "required": false, "description": "Product category"}
                    }
                }
            },
            "subtotal": {"type": "float", "min": 0, "required": true, "description": "Subtotal before tax"},
            "tax": {"type": "float", "min": 0, "required": true, "description": "Tax amount"},
            "total": {"type": "float", "min": 0, "required": true, "description": "Total including tax"},
            "currency": {
                "type": "enum",
                "values": ["USD", "CAD"],
                "default": "USD",
                "required": false,
                "description": "Currency code"
            },
            "created_at": {"type": "datetime", "format": "iso8601", "required": true, "description": "Cart creation timestamp"},
            "updated_at": {"type": "datetime", "format": "iso8601", "required": false, "description": "Last update timestamp"}
        },
        "coherence_rules": [
            "total = subtotal + tax",
            "subtotal = sum(items.quantity * items.price)",
            "items should be thematically related"
        ]
    }))
}

fn order() -> Schema {
    parse(json!({
        "name": "order",
        "domain": "ecommerce",
        "description": "Customer order with items and shipping",
        "fields": {
            "order_id": {
                "type": "string",
                "format": "ORD-{year}-{random:7}",
                "required": true,
                "description": "Unique order identifier"
            },
            "customer_id": {
                "type": "string",
                "format": "USR-{random:7}",
                "required": true,
                "description": "Customer who placed the order"
            },
            "items": {
                "type": "array",
                "required": true,
                "description": "Ordered items",
                "item_schema": {
                    "type": "object",
                    "fields": {
                        "sku": {"type": "string", "required": true},
                        "name": {"type": "string", "required": true},
                        "quantity": {"type": "integer", "min": 1, "required": true},
                        "price": {"type": "float", "min": 0.01, "required": true}
                    }
                }
            },
            "shipping_address": {
                "type": "object",
                "required": true,
                "description": "Shipping address",
                "fields": {
                    "street": {"type": "string", "required": true},
                    "city": {"type": "string", "required": true},
                    "state": {"type": "string", "required": true},
                    "zip": {"type": "string", "required": true},
                    "country": {"type": "string", "default": "US", "required": true}
                }
            },
            "billing_address": {
                "type": "object",
                "required": false,
                "description": "Billing address (optional, defaults to shipping)",
                "fields": {
                    "street": {"type": "string", "required": true},
                    "city": {"type": "string", "required": true},
                    "state": {"type": "string", "required": true},
                    "zip": {"type": "string", "required": true},
                    "country": {"type": "string", "default": "US", "required": true}
                }
            },
            "payment_method": {
                "type": "enum",
                "values": ["credit_card", "paypal", "apple_pay", "google_pay", "gift_card"],
                "required": true,
                "description": "Payment method used"
            },
            "status": {
                "type": "enum",
                "values": ["pending", "confirmed", "shipped", "delivered", "cancelled"],
                "default": "pending",
                "required": true,
                "description": "Order status"
            },
            "subtotal": {"type": "float", "min": 0, "required": true},
            "tax": {"type": "float", "min": 0, "required": true},
            "shipping_cost": {"type": "float", "min": 0, "required": true},
            "discount": {"type": "float", "min": 0, "required": false},
            "total": {"type": "float", "min": 0, "required": true},
            "created_at": {"type": "datetime", "format": "iso8601", "required": true},
            "updated_at": {"type": "datetime", "format": "iso8601", "required": false}
        },
        "coherence_rules": [
            "total = subtotal + tax + shipping_cost - discount",
            "updated_at >= created_at"
        ]
    }))
}

fn payment() -> Schema {
    parse(json!({
        "name": "payment",
        "domain": "ecommerce",
        "description": "Payment transaction record",
        "fields": {
            "payment_id": {
                "type": "string",
                "format": "PAY-{year}-{random:7}",
                "required": true,
                "description": "Unique payment identifier"
            },
            "order_id": {
                "type": "string",
                "format": "ORD-{year}-{random:7}",
                "required": true,
                "description": "Associated order ID"
            },
            "method": {
                "type": "enum",
                "values": ["credit_card", "debit_card", "paypal", "apple_pay", "google_pay", "gift_card"],
                "required": true,
                "description": "Payment method"
            },
            "amount": {"type": "float", "min": 0.01, "required": true, "description": "Payment amount"},
            "currency": {
                "type": "enum",
                "values": ["USD", "CAD", "EUR", "GBP"],
                "default": "USD",
                "required": true,
                "description": "Currency code"
            },
            "status": {
                "type": "enum",
                "values": ["pending", "authorized", "captured", "failed", "refunded"],
                "default": "pending",
                "required": true,
                "description": "Payment status"
            },
            "card_last_four": {
                "type": "string",
                "pattern": "^[0-9]{4}$",
                "required": false,
                "description": "Last 4 digits of card (if applicable)"
            },
            "transaction_id": {"type": "string", "required": false, "description": "External transaction ID"},
            "created_at": {"type": "datetime", "format": "iso8601", "required": true, "description": "Payment creation timestamp"},
            "authorized_at": {"type": "datetime", "format": "iso8601", "required": false, "description": "Authorization timestamp"},
            "captured_at": {"type": "datetime", "format": "iso8601", "required": false, "description": "Capture timestamp"}
        },
        "coherence_rules": [
            "authorized_at >= created_at if authorized_at exists",
            "captured_at >= authorized_at if captured_at exists"
        ]
    }))
}

fn product() -> Schema {
    parse(json!({
        "name": "product",
        "domain": "ecommerce",
        "description": "Product catalog item",
        "fields": {
            "product_id": {"type": "uuid", "required": true, "description": "Unique product identifier"},
            "name": {"type": "string", "required": true, "description": "Product display name"},
            "description": {"type": "string", "max_length": 200, "required": false, "description": "Marketing copy"},
            "price": {"type": "float", "min": 5.0, "max": 999.99, "required": true, "description": "List price"},
            "category": {
                "type": "enum",
                "values": ["Electronics", "Clothing", "Home", "Beauty", "Sports"],
                "required": true,
                "description": "Top-level category"
            },
            "sku": {"type": "string", "required": true, "description": "Stock keeping unit"},
            "in_stock": {"type": "boolean", "required": true, "description": "Availability flag"},
            "stock_quantity": {"type": "integer", "min": 0, "max": 500, "required": true, "description": "Units on hand"},
            "brand": {"type": "string", "required": true, "description": "Brand name"},
            "created_at": {"type": "datetime", "format": "iso8601", "required": true},
            "updated_at": {"type": "datetime", "format": "iso8601", "required": true}
        }
    }))
}

fn review() -> Schema {
    parse(json!({
        "name": "review",
        "domain": "ecommerce",
        "description": "Product review from customer",
        "fields": {
            "review_id": {
                "type": "string",
                "format": "REV-{random:10}",
                "required": true,
                "description": "Unique review identifier"
            },
            "product_id": {"type": "string", "required": true, "description": "Product being reviewed"},
            "user_id": {
                "type": "string",
                "format": "USR-{random:7}",
                "required": true,
                "description": "User who wrote the review"
            },
            "rating": {"type": "integer", "min": 1, "max": 5, "required": true, "description": "Star rating (1-5)"},
            "title": {"type": "string", "min_length": 5, "max_length": 100, "required": true, "description": "Review title"},
            "body": {"type": "string", "min_length": 10, "max_length": 5000, "required": true, "description": "Review text"},
            "verified_purchase": {"type": "boolean", "default": false, "required": true, "description": "Whether reviewer purchased the product"},
            "helpful_votes": {"type": "integer", "min": 0, "default": 0, "required": true, "description": "Number of helpful votes"},
            "created_at": {"type": "datetime", "format": "iso8601", "required": true, "description": "Review creation timestamp"}
        },
        "coherence_rules": [
            "title and body should match rating sentiment"
        ]
    }))
}

fn user() -> Schema {
    parse(json!({
        "name": "user",
        "domain": "ecommerce",
        "description": "Customer/user account",
        "fields": {
            "user_id": {
                "type": "string",
                "format": "USR-{random:7}",
                "required": true,
                "description": "Unique user identifier"
            },
            "email": {"type": "email", "required": true, "description": "User email address"},
            "first_name": {"type": "string", "min_length": 1, "max_length": 50, "required": true, "description": "First name"},
            "last_name": {"type": "string", "min_length": 1, "max_length": 50, "required": true, "description": "Last name"},
            "phone": {"type": "phone", "required": false, "description": "Phone number"},
            "addresses": {
                "type": "array",
                "required": false,
                "description": "Saved addresses",
                "item_schema": {
                    "type": "object",
                    "fields": {
                        "label": {"type": "string", "required": false, "description": "Address label (home, work, etc.)"},
                        "street": {"type": "string", "required": true},
                        "city": {"type": "string", "required": true},
                        "state": {"type": "string", "required": true},
                        "zip": {"type": "string", "required": true},
                        "country": {"type": "string", "default": "US", "required": true},
                        "is_default": {"type": "boolean", "default": false, "required": false}
                    }
                }
            },
            "loyalty_tier": {
                "type": "enum",
                "values": ["bronze", "silver", "gold", "platinum"],
                "default": "bronze",
                "required": false,
                "description": "Loyalty program tier"
            },
            "created_at": {"type": "datetime", "format": "iso8601", "required": true, "description": "Account creation timestamp"},
            "last_login": {"type": "datetime", "format": "iso8601", "required": false, "description": "Last login timestamp"}
        },
        "coherence_rules": [
            "last_login >= created_at if last_login exists"
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_all_builtins_parse() {
        let schemas = builtin_schemas();
        assert_eq!(schemas.len(), 6);
        for schema in &schemas {
            assert!(!schema.name.is_empty());
            assert_eq!(schema.domain, "ecommerce");
            assert!(!schema.fields.is_empty());
        }
    }

    #[test]
    fn test_cart_field_order_starts_with_ids() {
        let schema = cart();
        let names: Vec<&String> = schema.fields.keys().collect();
        assert_eq!(names[0], "cart_id");
        assert_eq!(names[1], "customer_id");
    }

    #[test]
    fn test_cart_items_are_object_arrays() {
        let schema = cart();
        let items = &schema.fields["items"];
        assert_eq!(items.field_type, FieldType::Array);
        let item = items.item_schema.as_ref().unwrap();
        assert_eq!(item.field_type, FieldType::Object);
        assert!(item.fields.contains_key("quantity"));
    }

    #[test]
    fn test_review_rating_bounds() {
        let schema = review();
        let rating = &schema.fields["rating"];
        assert_eq!(rating.min, Some(1.0));
        assert_eq!(rating.max, Some(5.0));
    }

    #[test]
    fn test_order_has_discount_rule() {
        let schema = order();
        assert!(schema
            .coherence_rules
            .iter()
            .any(|r| r.contains("discount")));
    }
}
