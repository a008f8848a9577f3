//! Order domain model and payment-status state machine guards.

use chrono::{DateTime, Utc};
use exchange_rates::CurrencyCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;
use crate::error::DomainError;

/// Unique identifier for an Order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random OrderId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an OrderId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Payment status of an order.
///
/// `Pending` is the initial state. `Complete` and `Cancelled` are terminal;
/// `Failed` still allows cancellation and payment retry.
///
/// Serialized with the single-letter wire codes used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum PaymentStatus {
    #[serde(rename = "P")]
    Pending,
    #[serde(rename = "C")]
    Complete,
    #[serde(rename = "F")]
    Failed,
    #[serde(rename = "X")]
    Cancelled,
}

impl PaymentStatus {
    /// Single-letter code used on the wire and in the database.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "P",
            PaymentStatus::Complete => "C",
            PaymentStatus::Failed => "F",
            PaymentStatus::Cancelled => "X",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(PaymentStatus::Pending),
            "C" => Some(PaymentStatus::Complete),
            "F" => Some(PaymentStatus::Failed),
            "X" => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Complete | PaymentStatus::Cancelled)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One priced line of an order.
///
/// `unit_price` is snapshotted in the order currency at build time and is
/// independent of later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: Uuid,
    pub item: Item,
    pub quantity: u32,
    pub unit_price: i64,
}

impl OrderLineItem {
    /// Line total in the order currency.
    pub fn total_price(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity as i64)
    }
}

/// The central entity: a priced order moving through the payment lifecycle.
///
/// Monetary fields are write-once at creation; only `payment_status` and
/// `payment_intent_id` mutate afterwards, and only through the payment
/// state machine. Invariant after every successful write:
/// `total == subtotal - discount_amount + tax_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    /// Gateway intent reference; unset until a payment session is created.
    #[serde(rename = "stripe_payment_intent_id")]
    pub payment_intent_id: Option<String>,
    pub items: Vec<OrderLineItem>,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub tax_amount: i64,
    pub total: i64,
    pub order_currency: CurrencyCode,
}

impl Order {
    /// Reconstructs an order from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OrderId,
        created_at: DateTime<Utc>,
        payment_status: PaymentStatus,
        payment_intent_id: Option<String>,
        items: Vec<OrderLineItem>,
        subtotal: i64,
        discount_amount: i64,
        tax_amount: i64,
        total: i64,
        order_currency: CurrencyCode,
    ) -> Self {
        Self {
            id,
            created_at,
            payment_status,
            payment_intent_id,
            items,
            subtotal,
            discount_amount,
            tax_amount,
            total,
            order_currency,
        }
    }

    /// Guard for create-session and confirm: the terminal states reject.
    pub fn ensure_payable(&self) -> Result<(), DomainError> {
        match self.payment_status {
            PaymentStatus::Cancelled => Err(DomainError::OrderCancelled),
            PaymentStatus::Complete => Err(DomainError::OrderCompleted),
            PaymentStatus::Pending | PaymentStatus::Failed => Ok(()),
        }
    }

    /// Guard for cancel: only `Pending` and `Failed` orders can be cancelled.
    pub fn ensure_cancellable(&self) -> Result<(), DomainError> {
        match self.payment_status {
            PaymentStatus::Pending | PaymentStatus::Failed => Ok(()),
            PaymentStatus::Complete | PaymentStatus::Cancelled => {
                Err(DomainError::CannotCancelProcessed)
            }
        }
    }
}
