//! Shared database types with feature-gated fields for SQLite and PostgreSQL.
//!
//! SQLite stores ids and timestamps as TEXT; PostgreSQL uses native UUID and
//! TIMESTAMPTZ columns. The row structs carry whichever representation the
//! active backend produces and `into_domain` hides the difference.

use sqlx::FromRow;
use uuid::Uuid;

use storefront_types::{
    Cart, CartId, CartLineItem, CurrencyCode, Item, ItemId, Order, OrderId, OrderLineItem,
    PaymentStatus, Percentage, PricingRule, RepoError, RuleId, RuleKind,
};

// ─────────────────────────────────────────────────────────────────────────────
// Feature-gated imports
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_currency(s: &str) -> Result<CurrencyCode, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown currency: {}", s)))
}

pub fn parse_status(s: &str) -> Result<PaymentStatus, RepoError> {
    PaymentStatus::from_code(s)
        .ok_or_else(|| RepoError::Database(format!("Unknown payment status: {}", s)))
}

pub fn parse_kind(s: &str) -> Result<RuleKind, RepoError> {
    RuleKind::from_tag(s).ok_or_else(|| RepoError::Database(format!("Unknown rule kind: {}", s)))
}

pub fn parse_quantity(q: i64) -> Result<u32, RepoError> {
    u32::try_from(q).map_err(|_| RepoError::Database(format!("Invalid quantity: {}", q)))
}

#[cfg(feature = "sqlite")]
fn parse_uuid(s: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
}

#[cfg(feature = "sqlite")]
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Item row from database.
#[derive(FromRow)]
pub struct DbItem {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
}

impl DbItem {
    /// Convert database row to domain Item.
    pub fn into_domain(self) -> Result<Item, RepoError> {
        let currency = parse_currency(&self.currency)?;

        #[cfg(not(feature = "sqlite"))]
        let id = ItemId::from_uuid(self.id);

        #[cfg(feature = "sqlite")]
        let id = ItemId::from_uuid(parse_uuid(&self.id)?);

        Ok(Item::from_parts(
            id,
            self.name,
            self.description,
            self.price,
            currency,
        ))
    }
}

/// Cart row from database (lines are fetched separately).
#[derive(FromRow)]
pub struct DbCart {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,
}

impl DbCart {
    /// Convert database row plus its lines to a domain Cart.
    pub fn into_domain(self, items: Vec<CartLineItem>) -> Result<Cart, RepoError> {
        #[cfg(not(feature = "sqlite"))]
        let (id, created_at) = (CartId::from_uuid(self.id), self.created_at);

        #[cfg(feature = "sqlite")]
        let (id, created_at) = (
            CartId::from_uuid(parse_uuid(&self.id)?),
            parse_timestamp(&self.created_at)?,
        );

        Ok(Cart {
            id,
            created_at,
            items,
        })
    }
}

/// Cart line joined with its item.
#[derive(FromRow)]
pub struct DbCartLine {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub quantity: i64,

    #[cfg(not(feature = "sqlite"))]
    pub item_id: Uuid,
    #[cfg(feature = "sqlite")]
    pub item_id: String,

    pub item_name: String,
    pub item_description: Option<String>,
    pub item_price: i64,
    pub item_currency: String,
}

impl DbCartLine {
    /// Convert database row to a domain cart line.
    pub fn into_domain(self) -> Result<CartLineItem, RepoError> {
        let quantity = parse_quantity(self.quantity)?;
        let currency = parse_currency(&self.item_currency)?;

        #[cfg(not(feature = "sqlite"))]
        let (id, item_id) = (self.id, ItemId::from_uuid(self.item_id));

        #[cfg(feature = "sqlite")]
        let (id, item_id) = (
            parse_uuid(&self.id)?,
            ItemId::from_uuid(parse_uuid(&self.item_id)?),
        );

        Ok(CartLineItem {
            id,
            item: Item::from_parts(
                item_id,
                self.item_name,
                self.item_description,
                self.item_price,
                currency,
            ),
            quantity,
        })
    }
}

/// Order row from database (lines are fetched separately).
#[derive(FromRow)]
pub struct DbOrder {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    pub payment_status: String,
    pub stripe_payment_intent_id: Option<String>,
    pub order_currency: String,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub tax_amount: i64,
    pub total: i64,
}

impl DbOrder {
    /// Convert database row plus its lines to a domain Order.
    pub fn into_domain(self, items: Vec<OrderLineItem>) -> Result<Order, RepoError> {
        let payment_status = parse_status(&self.payment_status)?;
        let order_currency = parse_currency(&self.order_currency)?;

        #[cfg(not(feature = "sqlite"))]
        let (id, created_at) = (OrderId::from_uuid(self.id), self.created_at);

        #[cfg(feature = "sqlite")]
        let (id, created_at) = (
            OrderId::from_uuid(parse_uuid(&self.id)?),
            parse_timestamp(&self.created_at)?,
        );

        Ok(Order::from_parts(
            id,
            created_at,
            payment_status,
            self.stripe_payment_intent_id,
            items,
            self.subtotal,
            self.discount_amount,
            self.tax_amount,
            self.total,
            order_currency,
        ))
    }
}

/// Order line joined with its item.
#[derive(FromRow)]
pub struct DbOrderLine {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub quantity: i64,
    pub unit_price: i64,

    #[cfg(not(feature = "sqlite"))]
    pub item_id: Uuid,
    #[cfg(feature = "sqlite")]
    pub item_id: String,

    pub item_name: String,
    pub item_description: Option<String>,
    pub item_price: i64,
    pub item_currency: String,
}

impl DbOrderLine {
    /// Convert database row to a domain order line.
    pub fn into_domain(self) -> Result<OrderLineItem, RepoError> {
        let quantity = parse_quantity(self.quantity)?;
        let currency = parse_currency(&self.item_currency)?;

        #[cfg(not(feature = "sqlite"))]
        let (id, item_id) = (self.id, ItemId::from_uuid(self.item_id));

        #[cfg(feature = "sqlite")]
        let (id, item_id) = (
            parse_uuid(&self.id)?,
            ItemId::from_uuid(parse_uuid(&self.item_id)?),
        );

        Ok(OrderLineItem {
            id,
            item: Item::from_parts(
                item_id,
                self.item_name,
                self.item_description,
                self.item_price,
                currency,
            ),
            quantity,
            unit_price: self.unit_price,
        })
    }
}

/// Pricing rule row from database.
#[derive(FromRow)]
pub struct DbRule {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub kind: String,
    pub name: String,
    pub percentage_bp: i64,

    #[cfg(not(feature = "sqlite"))]
    pub is_active: bool,
    #[cfg(feature = "sqlite")]
    pub is_active: i64,
}

impl DbRule {
    /// Convert database row to a domain PricingRule.
    pub fn into_domain(self) -> Result<PricingRule, RepoError> {
        let kind = parse_kind(&self.kind)?;
        let percentage = Percentage::from_basis_points(self.percentage_bp)
            .map_err(|e| RepoError::Database(e.to_string()))?;

        #[cfg(not(feature = "sqlite"))]
        let (id, is_active) = (RuleId::from_uuid(self.id), self.is_active);

        #[cfg(feature = "sqlite")]
        let (id, is_active) = (RuleId::from_uuid(parse_uuid(&self.id)?), self.is_active != 0);

        Ok(PricingRule::from_parts(
            id,
            kind,
            self.name,
            percentage,
            is_active,
        ))
    }
}
