//! # Domain Types
//!
//! Core domain types used throughout the inventory service.
//!
//! ## Product Record
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product                          JSON (camelCase)                      │
//! │  ─────────────                    ────────────────                      │
//! │  product_id        i64     ◄───►  productId       (assigned by store)  │
//! │  manufacturer      String  ◄───►  manufacturer                          │
//! │  sku               String  ◄───►  sku                                   │
//! │  upc               String  ◄───►  upc                                   │
//! │  price_per_unit    Money   ◄───►  pricePerUnit    ("9.99")              │
//! │  quantity_on_hand  i64     ◄───►  quantityOnHand  (>= 0)                │
//! │  product_name      String  ◄───►  productName                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database is the single source of truth; nothing here is cached.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A single inventory record.
///
/// `product_id` defaults to 0 when a create request omits it; the store
/// ignores it on insert and assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    #[serde(default)]
    pub product_id: i64,

    pub manufacturer: String,

    /// Stock Keeping Unit.
    pub sku: String,

    /// Universal Product Code.
    pub upc: String,

    /// Unit price, two fraction digits.
    pub price_per_unit: Money,

    /// Units currently in stock. Never negative.
    pub quantity_on_hand: i64,

    pub product_name: String,
}

impl Product {
    /// Returns a copy of this product carrying a different ID.
    pub fn with_id(&self, product_id: i64) -> Product {
        Product {
            product_id,
            ..self.clone()
        }
    }
}

// =============================================================================
// Ranking
// =============================================================================

/// Sorts products into ranking order: quantity on hand descending, then
/// product ID ascending for equal quantities.
///
/// The SQL ranking query uses the same order; this is the in-memory
/// reference used when a ranking is assembled outside the database.
pub fn rank_products(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.quantity_on_hand
            .cmp(&a.quantity_on_hand)
            .then(a.product_id.cmp(&b.product_id))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, qty: i64) -> Product {
        Product {
            product_id: id,
            manufacturer: "Acme".to_string(),
            sku: format!("SKU-{}", id),
            upc: "000".to_string(),
            price_per_unit: Money::from_cents(999),
            quantity_on_hand: qty,
            product_name: "Widget".to_string(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(product(3, 50)).unwrap();
        assert_eq!(json["productId"], 3);
        assert_eq!(json["pricePerUnit"], "9.99");
        assert_eq!(json["quantityOnHand"], 50);
        assert_eq!(json["productName"], "Widget");
    }

    #[test]
    fn test_create_body_without_id() {
        let body = r#"{
            "manufacturer": "Acme",
            "sku": "A1",
            "upc": "000",
            "pricePerUnit": 9.99,
            "quantityOnHand": 50,
            "productName": "Widget"
        }"#;
        let parsed: Product = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.product_id, 0);
        assert_eq!(parsed.price_per_unit.cents(), 999);
    }

    #[test]
    fn test_rank_products_orders_by_quantity_then_id() {
        let mut products = vec![product(1, 5), product(2, 50), product(3, 5), product(4, 20)];
        rank_products(&mut products);
        let ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }
}
