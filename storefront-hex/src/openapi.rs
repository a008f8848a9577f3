//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use storefront_types::domain::{PaymentStatus, RuleKind};
use storefront_types::dto::{
    AddCartItemRequest, CancelPaymentResponse, CartResponse, ConfirmPaymentResponse,
    CreateItemRequest, CreateOrderRequest, CreateRuleRequest, OrderIdRequest,
    PaymentSessionResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List catalog items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "catalog",
    responses(
        (status = 200, description = "All catalog items", body = inline(serde_json::Value))
    )
)]
async fn list_items() {}

/// Get a catalog item
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "The item", body = inline(serde_json::Value)),
        (status = 404, description = "Item not found")
    )
)]
async fn get_item() {}

/// Create a catalog item
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "catalog",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = inline(serde_json::Value)),
        (status = 400, description = "Invalid name, price or currency")
    )
)]
async fn create_item() {}

/// Buy a single item
///
/// Builds a one-line order in the requested currency (`cur` query
/// parameter, defaults to the base currency).
#[utoipa::path(
    get,
    path = "/api/buy/{item_id}",
    tag = "orders",
    params(
        ("item_id" = String, Path, description = "Item to buy"),
        ("cur" = Option<String>, Query, description = "Order currency (USD or EUR)")
    ),
    responses(
        (status = 201, description = "Priced order, payment pending", body = inline(serde_json::Value)),
        (status = 400, description = "Unknown item or unsupported currency")
    )
)]
async fn buy_item() {}

/// Create an order from a cart
///
/// Consumes the cart: all its lines become order lines with unit prices
/// converted into the order currency, and the cart is deleted.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Priced order, payment pending", body = inline(serde_json::Value)),
        (status = 400, description = "Unknown or empty cart, or unsupported currency")
    )
)]
async fn create_order() {}

/// Get an order
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order", body = inline(serde_json::Value)),
        (status = 404, description = "Order not found")
    )
)]
async fn get_order() {}

/// Create a payment session
///
/// Creates a provider payment intent for the order total and stores its
/// reference on the order. Allowed while the order is Pending or Failed.
#[utoipa::path(
    post,
    path = "/api/payment/sessions",
    tag = "payment",
    request_body = OrderIdRequest,
    responses(
        (status = 200, description = "Session created", body = PaymentSessionResponse),
        (status = 400, description = "Guard rejection or gateway error")
    )
)]
async fn create_payment_session() {}

/// Confirm a payment
///
/// Retrieves the intent from the provider; the order becomes Complete if
/// the intent settled, Failed otherwise. Both outcomes are 200.
#[utoipa::path(
    post,
    path = "/api/payment/confirm",
    tag = "payment",
    request_body = OrderIdRequest,
    responses(
        (status = 200, description = "Confirmation outcome", body = ConfirmPaymentResponse),
        (status = 400, description = "Guard rejection, missing session, or gateway error")
    )
)]
async fn confirm_payment() {}

/// Cancel a payment
///
/// Cancels the provider intent when one exists on a Pending order, then
/// marks the order Cancelled. Allowed from Pending and Failed.
#[utoipa::path(
    post,
    path = "/api/payment/cancel",
    tag = "payment",
    request_body = OrderIdRequest,
    responses(
        (status = 200, description = "Order cancelled", body = CancelPaymentResponse),
        (status = 400, description = "Guard rejection or gateway error")
    )
)]
async fn cancel_payment() {}

/// Create an empty cart
#[utoipa::path(
    post,
    path = "/api/carts",
    tag = "carts",
    responses(
        (status = 201, description = "New cart", body = CartResponse)
    )
)]
async fn create_cart() {}

/// Get a cart
#[utoipa::path(
    get,
    path = "/api/carts/{id}",
    tag = "carts",
    params(("id" = String, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "The cart", body = CartResponse),
        (status = 404, description = "Cart not found")
    )
)]
async fn get_cart() {}

/// Add an item to a cart
#[utoipa::path(
    post,
    path = "/api/carts/{id}/items",
    tag = "carts",
    params(("id" = String, Path, description = "Cart ID")),
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Cart line after the add", body = inline(serde_json::Value)),
        (status = 400, description = "Unknown item or invalid quantity"),
        (status = 404, description = "Cart not found")
    )
)]
async fn add_cart_item() {}

/// Delete a cart
#[utoipa::path(
    delete,
    path = "/api/carts/{id}",
    tag = "carts",
    params(("id" = String, Path, description = "Cart ID")),
    responses(
        (status = 204, description = "Cart deleted"),
        (status = 404, description = "Cart not found")
    )
)]
async fn delete_cart() {}

/// Create a pricing rule
#[utoipa::path(
    post,
    path = "/api/rules",
    tag = "rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 201, description = "Rule created (inactive)", body = inline(serde_json::Value)),
        (status = 400, description = "Invalid kind, name or percentage")
    )
)]
async fn create_rule() {}

/// List pricing rules
#[utoipa::path(
    get,
    path = "/api/rules",
    tag = "rules",
    params(("kind" = Option<String>, Query, description = "Filter: discount or tax")),
    responses(
        (status = 200, description = "Rules", body = inline(serde_json::Value))
    )
)]
async fn list_rules() {}

/// Activate a pricing rule
///
/// Atomically deactivates every other rule of the same kind, so at most
/// one rule per kind is ever active.
#[utoipa::path(
    post,
    path = "/api/rules/{id}/activate",
    tag = "rules",
    params(("id" = String, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "The activated rule", body = inline(serde_json::Value)),
        (status = 404, description = "Rule not found")
    )
)]
async fn activate_rule() {}

/// The OpenAPI document for the Storefront API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Order pricing and payment lifecycle for the storefront",
        version = "0.1.0"
    ),
    paths(
        health,
        list_items,
        get_item,
        create_item,
        buy_item,
        create_order,
        get_order,
        create_payment_session,
        confirm_payment,
        cancel_payment,
        create_cart,
        get_cart,
        add_cart_item,
        delete_cart,
        create_rule,
        list_rules,
        activate_rule,
    ),
    components(schemas(
        CreateItemRequest,
        AddCartItemRequest,
        CartResponse,
        CreateOrderRequest,
        OrderIdRequest,
        PaymentSessionResponse,
        ConfirmPaymentResponse,
        CancelPaymentResponse,
        CreateRuleRequest,
        PaymentStatus,
        RuleKind,
        exchange_rates::CurrencyCode,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "catalog", description = "Catalog items"),
        (name = "carts", description = "Pre-order staging carts"),
        (name = "orders", description = "Order building"),
        (name = "payment", description = "Payment state machine"),
        (name = "rules", description = "Discount and tax rules")
    )
)]
pub struct ApiDoc;
