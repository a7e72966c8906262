//! Admin dashboard API client.
//!
//! Authenticated HTTP implementation of the [`OrderService`] and
//! [`CatalogService`] seams against the dashboard's `/api/pos/*` routes.
//! Error bodies are preserved as structured JSON so the shared extraction
//! policy can surface field-level validation messages.

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{Order, OrderLine, OrderStatus, Page, PaymentMethod, Product};
use crate::service::{CatalogService, OrderService};

/// Default timeout for API requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the admin dashboard base URL:
/// - strip trailing slashes
/// - strip a trailing `/api` segment (request paths re-add it)
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    // Ensure scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    // Strip trailing slashes
    while url.ends_with('/') {
        url.pop();
    }

    // Strip trailing /api
    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach admin dashboard at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid admin dashboard URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Convert an HTTP status code into a user-friendly message.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Session is invalid or expired".to_string(),
        403 => "Not authorized for this operation".to_string(),
        404 => "Admin dashboard endpoint not found".to_string(),
        422 => "The submitted data was rejected".to_string(),
        s if s >= 500 => format!("Admin dashboard server error (HTTP {s})"),
        s => format!("Unexpected response from admin dashboard (HTTP {s})"),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection settings for the admin dashboard API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token; the auth header is omitted when absent.
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.trim().to_string());
        self
    }
}

/// Authenticated HTTP client for the admin dashboard API.
pub struct AdminClient {
    config: ApiConfig,
    client: Client,
}

impl AdminClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    /// Perform an authenticated request against `/api{path}`.
    ///
    /// Non-success responses become [`ApiError::Rejected`] with the parsed
    /// JSON body attached; empty success bodies come back as `Value::Null`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api{path}", self.config.base_url);
        debug!(method = %method, %url, "admin API request");

        let mut req = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await.map_err(|e| ApiError::Transport {
            message: friendly_error(&self.config.base_url, &e),
        })?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).ok();
            warn!(status = status.as_u16(), %url, "admin API rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: status_error(status),
                body,
            });
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Transport {
            message: format!("Invalid JSON from admin dashboard: {e}"),
        })
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Transport {
            message: format!("Unexpected payload from admin dashboard: {e}"),
        })
    }
}

impl OrderService for AdminClient {
    async fn create_order(&self) -> Result<Order, ApiError> {
        let value = self.request(Method::POST, "/pos/orders", None).await?;
        Self::decode(value)
    }

    async fn get_order(&self, order_id: i64) -> Result<Order, ApiError> {
        let value = self
            .request(Method::GET, &format!("/pos/orders/{order_id}"), None)
            .await?;
        Self::decode(value)
    }

    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError> {
        let path = match status {
            Some(status) => format!("/pos/orders?status={}", status.as_str()),
            None => "/pos/orders".to_string(),
        };
        let value = self.request(Method::GET, &path, None).await?;
        Self::decode(value)
    }

    async fn add_item(
        &self,
        order_id: i64,
        product_id: i64,
        quantity: u32,
    ) -> Result<OrderLine, ApiError> {
        let value = self
            .request(
                Method::POST,
                &format!("/pos/orders/{order_id}/items"),
                Some(serde_json::json!({
                    "product_id": product_id,
                    "quantity": quantity,
                })),
            )
            .await?;
        Self::decode(value)
    }

    async fn update_item(
        &self,
        order_id: i64,
        line_id: i64,
        quantity: u32,
    ) -> Result<OrderLine, ApiError> {
        let value = self
            .request(
                Method::PUT,
                &format!("/pos/orders/{order_id}/items/{line_id}"),
                Some(serde_json::json!({ "quantity": quantity })),
            )
            .await?;
        Self::decode(value)
    }

    async fn delete_item(&self, order_id: i64, line_id: i64) -> Result<(), ApiError> {
        self.request(
            Method::DELETE,
            &format!("/pos/orders/{order_id}/items/{line_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    async fn add_payment(
        &self,
        order_id: i64,
        method: PaymentMethod,
        amount: f64,
        paid_at: DateTime<Utc>,
    ) -> Result<Order, ApiError> {
        let value = self
            .request(
                Method::POST,
                &format!("/pos/orders/{order_id}/payments"),
                Some(serde_json::json!({
                    "method": method.as_str(),
                    "amount": amount,
                    "paid_at": paid_at.to_rfc3339(),
                })),
            )
            .await?;
        Self::decode(value)
    }

    async fn cancel_order(&self, order_id: i64) -> Result<Order, ApiError> {
        let value = self
            .request(
                Method::POST,
                &format!("/pos/orders/{order_id}/cancel"),
                None,
            )
            .await?;
        Self::decode(value)
    }
}

impl CatalogService for AdminClient {
    async fn list_products(&self, page: u32) -> Result<Page<Product>, ApiError> {
        let value = self
            .request(Method::GET, &format!("/pos/products?page={page}"), None)
            .await?;
        Self::decode(value)
    }
}
