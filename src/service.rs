//! Remote service seams consumed by the cart controller.
//!
//! The controller only ever talks to the admin dashboard through these two
//! traits; [`crate::api::AdminClient`] is the production implementation and
//! tests substitute in-memory fakes.

use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::{Order, OrderLine, OrderStatus, Page, PaymentMethod, Product};

/// Remote order service: the single source of truth for order state.
///
/// Every mutation returns server-computed data; callers re-fetch the full
/// order afterwards rather than patching local state.
#[allow(async_fn_in_trait)]
pub trait OrderService {
    /// Create a fresh draft order (empty lines, total 0).
    async fn create_order(&self) -> Result<Order, ApiError>;

    /// Fetch the full current state of an order.
    async fn get_order(&self, order_id: i64) -> Result<Order, ApiError>;

    /// List orders, optionally filtered by status.
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError>;

    /// Add `quantity` of a product to a draft order.
    async fn add_item(
        &self,
        order_id: i64,
        product_id: i64,
        quantity: u32,
    ) -> Result<OrderLine, ApiError>;

    /// Set the quantity of an existing line.
    async fn update_item(
        &self,
        order_id: i64,
        line_id: i64,
        quantity: u32,
    ) -> Result<OrderLine, ApiError>;

    /// Delete a line from a draft order.
    async fn delete_item(&self, order_id: i64, line_id: i64) -> Result<(), ApiError>;

    /// Record a payment; the server returns the now-paid order.
    async fn add_payment(
        &self,
        order_id: i64,
        method: PaymentMethod,
        amount: f64,
        paid_at: DateTime<Utc>,
    ) -> Result<Order, ApiError>;

    /// Cancel a draft order; the server returns it in its terminal state.
    async fn cancel_order(&self, order_id: i64) -> Result<Order, ApiError>;
}

/// Remote product catalog, read-only from the cart's point of view.
#[allow(async_fn_in_trait)]
pub trait CatalogService {
    /// Fetch one page of purchasable products.
    async fn list_products(&self, page: u32) -> Result<Page<Product>, ApiError>;
}
