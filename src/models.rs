//! Wire-level data model for the POS admin dashboard API.
//!
//! Shapes mirror what the admin API serves: the order snapshot with its
//! embedded lines and payments, catalog products, and the pagination
//! envelope the catalog listing uses. The cart never derives totals or
//! ids from these locally; the server's copy is authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A sellable catalog product. Immutable from the cart's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cost_price: f64,
    pub sale_price: f64,
    pub stock: i64,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pagination envelope used by the catalog listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Lifecycle status of an order. Only `Draft` accepts line mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Draft,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One product-quantity-price entry within an order.
///
/// `subtotal` and `profit` are computed server-side; the invariant
/// `subtotal == quantity * price` is the server's to uphold and ours to
/// display untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub price: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// The full server-confirmed state of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatus,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether line mutation is still allowed.
    pub fn is_editable(&self) -> bool {
        self.status == OrderStatus::Draft
    }

    /// Find a line by the product it references.
    pub fn line_for_product(&self, product_id: i64) -> Option<&OrderLine> {
        self.items.iter().find(|line| line.product_id == product_id)
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

/// A recorded payment against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub method: PaymentMethod,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_deserializes_api_field_names() {
        let raw = serde_json::json!({
            "id": 7,
            "status": "DRAFT",
            "total": 29.97,
            "items": [{
                "id": 41,
                "order_id": 7,
                "product_id": 1,
                "quantity": 3,
                "price": 9.99,
                "subtotal": 29.97,
                "profit": 12.0,
                "product": {
                    "id": 1,
                    "name": "Widget",
                    "sale_price": 9.99,
                    "stock": 5,
                    "active": true
                }
            }],
            "payments": []
        });

        let order: Order = serde_json::from_value(raw).expect("deserialize order");
        assert_eq!(order.status, OrderStatus::Draft);
        assert!(order.is_editable());
        assert_eq!(order.items.len(), 1);
        let line = order.line_for_product(1).expect("line present");
        assert_eq!(line.quantity, 3);
        assert!((line.subtotal - line.quantity as f64 * line.price).abs() < 1e-9);
        assert!(order.line_for_product(99).is_none());
    }

    #[test]
    fn statuses_and_methods_serialize_uppercase() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Cancelled).unwrap(),
            serde_json::json!("CANCELLED")
        );
        assert_eq!(
            serde_json::to_value(PaymentMethod::Transfer).unwrap(),
            serde_json::json!("TRANSFER")
        );
        assert_eq!(OrderStatus::Paid.as_str(), "PAID");
        assert_eq!(PaymentMethod::Cash.as_str(), "CASH");
    }

    #[test]
    fn payment_round_trips_paid_at() {
        let raw = serde_json::json!({
            "id": 3,
            "order_id": 7,
            "method": "CASH",
            "amount": 29.97,
            "paid_at": "2026-08-24T12:00:00Z"
        });
        let payment: Payment = serde_json::from_value(raw).expect("deserialize payment");
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert_eq!(payment.amount, 29.97);
        assert_eq!(payment.paid_at.to_rfc3339(), "2026-08-24T12:00:00+00:00");
    }
}
