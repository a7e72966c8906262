//! Order-building core for the POS admin dashboard.
//!
//! Two cooperating pieces make up the crate: [`OrderCart`], the controller
//! that builds one sale against the remote order service (commit-then-refresh,
//! server-authoritative totals, busy-gated mutations), and
//! [`SelectionSearch`], the headless generic search-select widget that feeds
//! it chosen products. The remote API is consumed through the
//! [`OrderService`]/[`CatalogService`] traits; [`AdminClient`] is the
//! reqwest-backed implementation.

mod api;
mod cart;
mod error;
mod models;
mod pointer;
mod select;
mod service;

pub use api::{normalize_base_url, AdminClient, ApiConfig};
pub use cart::OrderCart;
pub use error::{extract_error, ApiError, CartError};
pub use models::{Order, OrderLine, OrderStatus, Page, Payment, PaymentMethod, Product};
pub use pointer::{PointerGuard, PointerRouter, RegionId};
pub use select::{Panel, SelectConfig, SelectionSearch, DEFAULT_MAX_OPTIONS};
pub use service::{CatalogService, OrderService};
