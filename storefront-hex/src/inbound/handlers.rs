//! HTTP request handlers.
//!
//! Every known error kind is mapped to a status code in exactly one place,
//! `ApiError::into_response`. Ids and currency codes arrive as strings and
//! are parsed here, so malformed input is a 400, never a 500.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use storefront_types::{
    AppError, CartId, ItemId, OrderId, PaymentGateway, RuleId, RuleKind, ShopRepository, dto,
};

use crate::CheckoutService;
use crate::service::parse_currency;

/// Application state shared across handlers.
pub struct AppState<R: ShopRepository, G: PaymentGateway> {
    pub service: CheckoutService<R, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Gateway(msg) => (StatusCode::BAD_REQUEST, format!("Gateway error: {}", msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)).into())
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// List all items.
#[tracing::instrument(skip(state))]
pub async fn list_items<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.service.list_items().await?;
    Ok(Json(items))
}

/// Get item by ID.
#[tracing::instrument(skip(state), fields(item_id = %id))]
pub async fn get_item<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item_id: ItemId = parse_id(&id, "item")?;
    let item = state.service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create a catalog item.
#[tracing::instrument(skip(state), fields(name = %req.name))]
pub async fn create_item<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.service.create_item(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Buy & orders
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BuyParams {
    pub cur: Option<String>,
}

/// Buy a single item: builds a priced one-line order in the requested
/// currency.
#[tracing::instrument(skip(state), fields(item_id = %id))]
pub async fn buy_item<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
    Query(params): Query<BuyParams>,
) -> Result<impl IntoResponse, ApiError> {
    let item_id: ItemId = parse_id(&id, "item")?;
    let currency = match params.cur.as_deref() {
        Some(code) => parse_currency(code)?,
        None => state.service.rates().base(),
    };

    let order = state.service.buy_item(item_id, currency).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Create an order from a cart.
#[tracing::instrument(skip(state), fields(cart_id = %req.cart_id))]
pub async fn create_order<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cart_id: CartId = parse_id(&req.cart_id, "cart")?;
    let currency = match req.currency.as_deref() {
        Some(code) => parse_currency(code)?,
        None => state.service.rates().base(),
    };

    let order = state.service.create_order(cart_id, currency).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get order by ID.
#[tracing::instrument(skip(state), fields(order_id = %id))]
pub async fn get_order<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id: OrderId = parse_id(&id, "order")?;
    let order = state.service.get_order(order_id).await?;
    Ok(Json(order))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment state machine
// ─────────────────────────────────────────────────────────────────────────────

/// Create a payment session for an order.
#[tracing::instrument(skip(state), fields(order_id = %req.order_id))]
pub async fn create_payment_session<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::OrderIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id: OrderId = parse_id(&req.order_id, "order")?;
    let session = state.service.create_payment_session(order_id).await?;
    Ok(Json(session))
}

/// Confirm an order's payment against the gateway.
///
/// Both outcomes that reached the gateway return 200; only guard
/// rejections and errors are 4xx.
#[tracing::instrument(skip(state), fields(order_id = %req.order_id))]
pub async fn confirm_payment<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::OrderIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id: OrderId = parse_id(&req.order_id, "order")?;
    let result = state.service.confirm_payment(order_id).await?;
    Ok(Json(result))
}

/// Cancel an order.
#[tracing::instrument(skip(state), fields(order_id = %req.order_id))]
pub async fn cancel_payment<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::OrderIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id: OrderId = parse_id(&req.order_id, "order")?;
    let result = state.service.cancel_payment(order_id).await?;
    Ok(Json(result))
}

// ─────────────────────────────────────────────────────────────────────────────
// Carts
// ─────────────────────────────────────────────────────────────────────────────

/// Create an empty cart.
#[tracing::instrument(skip(state))]
pub async fn create_cart<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.service.create_cart().await?;
    Ok((StatusCode::CREATED, Json(dto::CartResponse::from(cart))))
}

/// Get cart by ID.
#[tracing::instrument(skip(state), fields(cart_id = %id))]
pub async fn get_cart<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cart_id: CartId = parse_id(&id, "cart")?;
    let cart = state.service.get_cart(cart_id).await?;
    Ok(Json(dto::CartResponse::from(cart)))
}

/// Add an item to a cart.
#[tracing::instrument(skip(state), fields(cart_id = %id, item_id = %req.item_id))]
pub async fn add_cart_item<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
    Json(req): Json<dto::AddCartItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cart_id: CartId = parse_id(&id, "cart")?;
    let item_id: ItemId = parse_id(&req.item_id, "item")?;

    let line = state
        .service
        .add_cart_item(cart_id, item_id, req.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// Delete a cart.
#[tracing::instrument(skip(state), fields(cart_id = %id))]
pub async fn delete_cart<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cart_id: CartId = parse_id(&id, "cart")?;
    state.service.delete_cart(cart_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Pricing rules
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListRulesParams {
    pub kind: Option<String>,
}

/// Create a discount or tax rule (inactive until activated).
#[tracing::instrument(skip(state), fields(kind = %req.kind, name = %req.name))]
pub async fn create_rule<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<dto::CreateRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rule = state.service.create_rule(req).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// List rules, optionally filtered by kind.
#[tracing::instrument(skip(state))]
pub async fn list_rules<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Query(params): Query<ListRulesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let rules = match params.kind.as_deref() {
        Some(tag) => {
            let kind = RuleKind::from_tag(tag).ok_or_else(|| {
                AppError::BadRequest("Rule kind must be 'discount' or 'tax'".to_string())
            })?;
            state.service.list_rules(kind).await?
        }
        None => {
            let mut rules = state.service.list_rules(RuleKind::Discount).await?;
            rules.extend(state.service.list_rules(RuleKind::Tax).await?);
            rules
        }
    };
    Ok(Json(rules))
}

/// Activate a rule, deactivating all others of its kind.
#[tracing::instrument(skip(state), fields(rule_id = %id))]
pub async fn activate_rule<R: ShopRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rule_id: RuleId = parse_id(&id, "rule")?;
    let rule = state.service.activate_rule(rule_id).await?;
    Ok(Json(rule))
}
