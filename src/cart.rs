//! Order-building controller.
//!
//! `OrderCart` owns the screen state for one "build a sale" session: the
//! catalog, the authoritative order snapshot, the current product
//! selection, and the busy flag that serializes mutations. Every mutation
//! goes commit-then-refresh: issue the remote call, then re-fetch the full
//! order and replace the snapshot wholesale. Totals, subtotals, and ids
//! are never computed locally once the order exists remotely.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{extract_error, CartError};
use crate::models::{Order, PaymentMethod, Product};
use crate::service::{CatalogService, OrderService};

/// Cap on product suggestions fed to the search widget.
const MAX_SUGGESTIONS: usize = 20;

// Local precondition messages. Surfaced verbatim, so tests pin them.
const MSG_NO_ORDER: &str = "The order could not be created";
const MSG_NOT_EDITABLE: &str = "The order can no longer be edited";
const MSG_INVALID_SELECTION: &str = "Select a product and a valid quantity";
const MSG_BUSY: &str = "Another operation is in progress";
const MSG_ORDER_CLOSED: &str = "The order was already paid or cancelled";
const MSG_EMPTY_CART: &str = "Add at least one product before confirming";
const MSG_TOTAL_ZERO: &str = "The total must be greater than zero";
const MSG_PAID: &str = "Order paid successfully";
const MSG_CANCELLED: &str = "Order cancelled";

// Fallbacks for remote failures that carry no usable error body.
const FB_INIT: &str = "Could not start the order";
const FB_ADD: &str = "Could not add the product";
const FB_UPDATE: &str = "Could not update the quantity";
const FB_REMOVE: &str = "Could not remove the item";
const FB_REFRESH: &str = "Could not refresh the order";
const FB_CONFIRM: &str = "Could not confirm the order";
const FB_CANCEL: &str = "Could not cancel the order";

/// Controller for one order-building session.
///
/// `S` is the remote backend; production uses [`crate::api::AdminClient`],
/// tests an in-memory fake. At most one mutation is in flight at a time:
/// every mutating operation is busy-gated and rejected while another one
/// is pending.
pub struct OrderCart<S> {
    backend: S,
    products: Vec<Product>,
    order: Option<Order>,
    selected: Option<Product>,
    quantity: i64,
    loading: bool,
    busy: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<S> OrderCart<S>
where
    S: OrderService + CatalogService,
{
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            products: Vec::new(),
            order: None,
            selected: None,
            quantity: 1,
            loading: false,
            busy: false,
            error: None,
            success: None,
        }
    }

    // -- exposed state -----------------------------------------------------

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The last server-confirmed order snapshot.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a mutation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Whether the order still accepts line mutation.
    pub fn editable(&self) -> bool {
        self.order.as_ref().is_some_and(Order::is_editable)
    }

    // -- selection inputs --------------------------------------------------

    pub fn select_product(&mut self, product: Product) {
        self.selected = Some(product);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Quantity for the next add. Non-positive values are kept so the
    /// validation in [`add_line`](Self::add_line) can report them.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    /// Narrow the catalog for the search widget: name-contains,
    /// case-insensitive, capped at 20 suggestions.
    pub fn filtered_products(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.products.iter().take(MAX_SUGGESTIONS).collect();
        }
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    // -- initialization ----------------------------------------------------

    /// Fetch the catalog and create a fresh draft order, concurrently.
    ///
    /// Both must succeed; otherwise one extracted error is surfaced and the
    /// cart stays uninitialized. No automatic retry — the caller re-invokes
    /// on explicit user action.
    pub async fn initialize(&mut self) -> Result<(), CartError> {
        self.error = None;
        self.success = None;
        self.loading = true;

        let (catalog, order) = tokio::join!(
            self.backend.list_products(1),
            self.backend.create_order()
        );
        self.loading = false;

        match (catalog, order) {
            (Ok(page), Ok(order)) => {
                info!(
                    order_id = order.id,
                    products = page.data.len(),
                    "order session initialized"
                );
                self.products = page.data;
                self.order = Some(order);
                Ok(())
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "order session initialization failed");
                let msg = extract_error(&err, FB_INIT);
                self.error = Some(msg.clone());
                Err(CartError::Remote(msg))
            }
        }
    }

    // -- mutations ---------------------------------------------------------

    /// Add the currently selected product, at the current quantity, to the
    /// draft order.
    ///
    /// Win or lose, the selection is cleared and the quantity reset to 1 so
    /// a stale selection cannot be double-submitted.
    pub async fn add_line(&mut self) -> Result<(), CartError> {
        if self.busy {
            return Err(self.reject(MSG_BUSY));
        }
        let Some(order_id) = self.order.as_ref().map(|o| o.id) else {
            return Err(self.reject(MSG_NO_ORDER));
        };
        if !self.editable() {
            return Err(self.reject(MSG_NOT_EDITABLE));
        }
        let product_id = match self.selected.as_ref() {
            Some(product) if self.quantity > 0 => product.id,
            _ => return Err(self.reject(MSG_INVALID_SELECTION)),
        };
        let quantity = self.quantity as u32;

        self.begin();
        let result = self.commit_add(order_id, product_id, quantity).await;
        self.busy = false;
        self.selected = None;
        self.quantity = 1;
        self.record(result)
    }

    /// Set a line's quantity, addressing it by the product it references.
    ///
    /// Unknown products are a silent no-op; a non-positive quantity removes
    /// the line instead of mutating it to an invalid value.
    pub async fn update_line_quantity(
        &mut self,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), CartError> {
        if self.busy {
            return Err(self.reject(MSG_BUSY));
        }
        let Some(order) = self.order.as_ref() else {
            return Err(self.reject(MSG_NO_ORDER));
        };
        if !order.is_editable() {
            return Err(self.reject(MSG_NOT_EDITABLE));
        }
        let Some(line_id) = order.line_for_product(product_id).map(|line| line.id) else {
            return Ok(());
        };
        if quantity <= 0 {
            return self.remove_line(product_id).await;
        }
        let order_id = order.id;

        self.begin();
        let result = self
            .commit_update(order_id, line_id, quantity as u32)
            .await;
        self.busy = false;
        self.record(result)
    }

    /// Remove a line, addressing it by the product it references.
    /// Unknown products are a silent no-op.
    pub async fn remove_line(&mut self, product_id: i64) -> Result<(), CartError> {
        if self.busy {
            return Err(self.reject(MSG_BUSY));
        }
        let Some(order) = self.order.as_ref() else {
            return Err(self.reject(MSG_NO_ORDER));
        };
        if !order.is_editable() {
            return Err(self.reject(MSG_NOT_EDITABLE));
        }
        let Some(line_id) = order.line_for_product(product_id).map(|line| line.id) else {
            return Ok(());
        };
        let order_id = order.id;

        self.begin();
        let result = self.commit_remove(order_id, line_id).await;
        self.busy = false;
        self.record(result)
    }

    /// Close the order with a single full-amount payment.
    ///
    /// The amount is the server's current total; the timestamp is captured
    /// at confirmation time. On success the snapshot becomes the returned
    /// PAID order; on failure the order stays DRAFT.
    pub async fn confirm(&mut self, method: PaymentMethod) -> Result<(), CartError> {
        if self.busy {
            return Err(self.reject(MSG_BUSY));
        }
        let Some(order) = self.order.as_ref() else {
            return Err(self.reject(MSG_NO_ORDER));
        };
        if !order.is_editable() {
            return Err(self.reject(MSG_ORDER_CLOSED));
        }
        if order.items.is_empty() {
            return Err(self.reject(MSG_EMPTY_CART));
        }
        if order.total <= 0.0 {
            return Err(self.reject(MSG_TOTAL_ZERO));
        }
        let order_id = order.id;
        let amount = order.total;

        self.begin();
        let paid_at = Utc::now();
        let result = self
            .backend
            .add_payment(order_id, method, amount, paid_at)
            .await;
        self.busy = false;

        match result {
            Ok(paid) => {
                info!(
                    order_id,
                    method = method.as_str(),
                    amount,
                    "order confirmed and paid"
                );
                self.order = Some(paid);
                self.success = Some(MSG_PAID.to_string());
                Ok(())
            }
            Err(err) => {
                warn!(order_id, error = %err, "payment failed");
                let result = Err(CartError::Remote(extract_error(&err, FB_CONFIRM)));
                self.record(result)
            }
        }
    }

    /// Cancel the draft order. The snapshot becomes the returned CANCELLED
    /// order, which rejects all further mutation.
    pub async fn cancel(&mut self) -> Result<(), CartError> {
        if self.busy {
            return Err(self.reject(MSG_BUSY));
        }
        let Some(order) = self.order.as_ref() else {
            return Err(self.reject(MSG_NO_ORDER));
        };
        if !order.is_editable() {
            return Err(self.reject(MSG_ORDER_CLOSED));
        }
        let order_id = order.id;

        self.begin();
        let result = self.backend.cancel_order(order_id).await;
        self.busy = false;

        match result {
            Ok(cancelled) => {
                info!(order_id, "order cancelled");
                self.order = Some(cancelled);
                self.success = Some(MSG_CANCELLED.to_string());
                Ok(())
            }
            Err(err) => {
                warn!(order_id, error = %err, "cancel failed");
                let result = Err(CartError::Remote(extract_error(&err, FB_CANCEL)));
                self.record(result)
            }
        }
    }

    // -- internals ---------------------------------------------------------

    fn begin(&mut self) {
        self.busy = true;
        self.error = None;
        self.success = None;
    }

    fn reject(&mut self, msg: &str) -> CartError {
        self.error = Some(msg.to_string());
        CartError::Validation(msg.to_string())
    }

    fn record(&mut self, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(err) = &result {
            self.error = Some(err.message().to_string());
        }
        result
    }

    async fn commit_add(
        &mut self,
        order_id: i64,
        product_id: i64,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.backend
            .add_item(order_id, product_id, quantity)
            .await
            .map_err(|err| {
                warn!(order_id, product_id, error = %err, "add item failed");
                CartError::Remote(extract_error(&err, FB_ADD))
            })?;
        info!(order_id, product_id, quantity, "line added");
        self.refresh(order_id).await
    }

    async fn commit_update(
        &mut self,
        order_id: i64,
        line_id: i64,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.backend
            .update_item(order_id, line_id, quantity)
            .await
            .map_err(|err| {
                warn!(order_id, line_id, error = %err, "quantity update failed");
                CartError::Remote(extract_error(&err, FB_UPDATE))
            })?;
        info!(order_id, line_id, quantity, "line quantity updated");
        self.refresh(order_id).await
    }

    async fn commit_remove(&mut self, order_id: i64, line_id: i64) -> Result<(), CartError> {
        self.backend
            .delete_item(order_id, line_id)
            .await
            .map_err(|err| {
                warn!(order_id, line_id, error = %err, "line removal failed");
                CartError::Remote(extract_error(&err, FB_REMOVE))
            })?;
        info!(order_id, line_id, "line removed");
        self.refresh(order_id).await
    }

    /// Re-fetch the order and replace the snapshot wholesale.
    async fn refresh(&mut self, order_id: i64) -> Result<(), CartError> {
        let order = self.backend.get_order(order_id).await.map_err(|err| {
            warn!(order_id, error = %err, "order refresh failed");
            CartError::Remote(extract_error(&err, FB_REFRESH))
        })?;
        info!(
            order_id,
            total = order.total,
            lines = order.items.len(),
            "order snapshot replaced"
        );
        self.order = Some(order);
        Ok(())
    }
}
