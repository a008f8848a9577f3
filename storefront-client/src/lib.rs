//! # Storefront Client SDK
//!
//! A typed Rust client for the Storefront API.

use exchange_rates::CurrencyCode;
use reqwest::Client;
use serde::de::DeserializeOwned;

use storefront_types::{
    CartId, CartLineItem, Item, ItemId, Order, OrderId, PricingRule, RuleId, RuleKind,
    dto::{
        AddCartItemRequest, CancelPaymentResponse, CartResponse, ConfirmPaymentResponse,
        CreateItemRequest, CreateOrderRequest, CreateRuleRequest, OrderIdRequest,
        PaymentSessionResponse,
    },
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storefront API client.
pub struct StorefrontClient {
    base_url: String,
    http: Client,
}

impl StorefrontClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all catalog items.
    pub async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        self.get("/api/items").await
    }

    /// Gets an item by ID.
    pub async fn get_item(&self, id: ItemId) -> Result<Item, ClientError> {
        self.get(&format!("/api/items/{}", id)).await
    }

    /// Creates a catalog item. Price is in minor units of `currency`
    /// (defaults to the server's base currency).
    pub async fn create_item(
        &self,
        name: &str,
        description: Option<String>,
        price: i64,
        currency: Option<CurrencyCode>,
    ) -> Result<Item, ClientError> {
        let req = CreateItemRequest {
            name: name.to_string(),
            description,
            price,
            currency: currency.map(|c| c.to_string()),
        };
        self.post("/api/items", &req).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Carts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an empty cart.
    pub async fn create_cart(&self) -> Result<CartResponse, ClientError> {
        self.post_empty("/api/carts").await
    }

    /// Gets a cart by ID.
    pub async fn get_cart(&self, id: CartId) -> Result<CartResponse, ClientError> {
        self.get(&format!("/api/carts/{}", id)).await
    }

    /// Adds an item to a cart.
    pub async fn add_cart_item(
        &self,
        cart_id: CartId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<CartLineItem, ClientError> {
        let req = AddCartItemRequest {
            item_id: item_id.to_string(),
            quantity,
        };
        self.post(&format!("/api/carts/{}/items", cart_id), &req)
            .await
    }

    /// Deletes a cart.
    pub async fn delete_cart(&self, id: CartId) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/carts/{}", self.base_url, id))
            .send()
            .await?;
        self.expect_success(resp).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────────────

    /// Buys a single item, creating a one-line order in `currency`
    /// (defaults to the server's base currency).
    pub async fn buy_item(
        &self,
        item_id: ItemId,
        currency: Option<CurrencyCode>,
    ) -> Result<Order, ClientError> {
        let path = match currency {
            Some(cur) => format!("/api/buy/{}?cur={}", item_id, cur),
            None => format!("/api/buy/{}", item_id),
        };
        self.get(&path).await
    }

    /// Creates an order from a cart, consuming the cart.
    pub async fn create_order(
        &self,
        cart_id: CartId,
        currency: Option<CurrencyCode>,
    ) -> Result<Order, ClientError> {
        let req = CreateOrderRequest {
            cart_id: cart_id.to_string(),
            currency: currency.map(|c| c.to_string()),
        };
        self.post("/api/orders", &req).await
    }

    /// Gets an order by ID.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ClientError> {
        self.get(&format!("/api/orders/{}", id)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment lifecycle
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a payment session for an order.
    pub async fn create_payment_session(
        &self,
        order_id: OrderId,
    ) -> Result<PaymentSessionResponse, ClientError> {
        let req = OrderIdRequest {
            order_id: order_id.to_string(),
        };
        self.post("/api/payment/sessions", &req).await
    }

    /// Confirms an order's payment.
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
    ) -> Result<ConfirmPaymentResponse, ClientError> {
        let req = OrderIdRequest {
            order_id: order_id.to_string(),
        };
        self.post("/api/payment/confirm", &req).await
    }

    /// Cancels an order.
    pub async fn cancel_payment(
        &self,
        order_id: OrderId,
    ) -> Result<CancelPaymentResponse, ClientError> {
        let req = OrderIdRequest {
            order_id: order_id.to_string(),
        };
        self.post("/api/payment/cancel", &req).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pricing rules
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a discount or tax rule (inactive).
    pub async fn create_rule(
        &self,
        kind: RuleKind,
        name: &str,
        percentage: f64,
    ) -> Result<PricingRule, ClientError> {
        let req = CreateRuleRequest {
            kind: match kind {
                RuleKind::Discount => "discount".to_string(),
                RuleKind::Tax => "tax".to_string(),
            },
            name: name.to_string(),
            percentage,
        };
        self.post("/api/rules", &req).await
    }

    /// Lists rules, optionally filtered by kind.
    pub async fn list_rules(
        &self,
        kind: Option<RuleKind>,
    ) -> Result<Vec<PricingRule>, ClientError> {
        let path = match kind {
            Some(RuleKind::Discount) => "/api/rules?kind=discount",
            Some(RuleKind::Tax) => "/api/rules?kind=tax",
            None => "/api/rules",
        };
        self.get(path).await
    }

    /// Activates a rule.
    pub async fn activate_rule(&self, id: RuleId) -> Result<PricingRule, ClientError> {
        self.post_empty(&format!("/api/rules/{}/activate", id)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Plumbing
    // ─────────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(self.api_error(resp).await)
        }
    }

    async fn expect_success(&self, resp: reqwest::Response) -> Result<(), ClientError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.api_error(resp).await)
        }
    }

    async fn api_error(&self, resp: reqwest::Response) -> ClientError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StorefrontClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = StorefrontClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
