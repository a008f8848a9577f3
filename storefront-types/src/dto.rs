//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Request ids and currency codes arrive as plain strings and are parsed in
//! the handlers so a malformed value maps to a 400 validation error instead
//! of leaking through as an internal error.

use chrono::{DateTime, Utc};
use exchange_rates::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Cart, CartLineItem, OrderId};

// ─────────────────────────────────────────────────────────────────────────────
// Catalog DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Display name
    #[schema(example = "Espresso cup")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in minor units of the catalog currency
    #[schema(example = 1250)]
    pub price: i64,
    /// Catalog currency code; defaults to the base currency
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub currency: Option<String>,
}

/// Validated item fields handed to the repository.
#[derive(Debug, Clone)]
pub struct CreateItemFields {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: CurrencyCode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to add an item to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    /// Catalog item id
    pub item_id: String,
    /// Units to add; added to the existing line if the item is already there
    #[schema(example = 2)]
    pub quantity: u32,
}

/// Cart body with the computed total.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    #[schema(value_type = String)]
    pub id: crate::domain::CartId,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<CartLineItem>,
    /// Sum of line totals in the catalog currency, minor units
    pub total_price: i64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total_price = cart.total_price();
        Self {
            id: cart.id,
            created_at: cart.created_at,
            items: cart.items,
            total_price,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Order DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to build an order from a cart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Cart to consume
    pub cart_id: String,
    /// Order currency; defaults to the base currency
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "EUR")]
    pub currency: Option<String>,
}

/// Body naming the order a payment operation applies to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderIdRequest {
    pub order_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Response after creating a payment session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentSessionResponse {
    /// Secret the front end uses to drive the provider's payment UI
    pub client_secret: Option<String>,
    /// Provider intent reference, also stored on the order
    pub payment_intent_id: String,
    /// Amount in minor units of `currency`
    #[schema(example = 9000)]
    pub amount: i64,
    pub currency: CurrencyCode,
}

/// Response after a confirm attempt that reached the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    /// "success" when the gateway reports the intent settled, else "failed"
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
    #[schema(value_type = String)]
    pub order_id: OrderId,
}

/// Response after a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelPaymentResponse {
    #[schema(example = "Payment cancelled successfully")]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pricing rule DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a discount or tax rule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRuleRequest {
    /// "discount" or "tax"
    #[schema(example = "discount")]
    pub kind: String,
    #[schema(example = "Summer sale")]
    pub name: String,
    /// Percentage in [0, 100], up to two decimals
    #[schema(example = 10.0)]
    pub percentage: f64,
}
