//! Payment gateway port.
//!
//! The external payment provider is reduced to the three intent operations
//! the state machine needs. Every call names the order's currency so the
//! adapter can route to the credential set for that currency; there is no
//! mutable global client state.

use exchange_rates::CurrencyCode;
use serde::{Deserialize, Serialize};

use crate::domain::OrderId;
use crate::error::GatewayError;

/// Provider-side status of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    Unknown,
}

impl IntentStatus {
    /// Settled means the provider reports terminal success.
    pub fn is_settled(&self) -> bool {
        matches!(self, IntentStatus::Succeeded)
    }

    /// Maps a provider status string; statuses this system does not act on
    /// collapse to `Unknown` (which is never settled).
    pub fn from_wire(s: &str) -> Self {
        match s {
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => IntentStatus::RequiresConfirmation,
            "requires_action" => IntentStatus::RequiresAction,
            "processing" => IntentStatus::Processing,
            "requires_capture" => IntentStatus::RequiresCapture,
            "canceled" => IntentStatus::Canceled,
            "succeeded" => IntentStatus::Succeeded,
            _ => IntentStatus::Unknown,
        }
    }

    /// The provider's wire name for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresCapture => "requires_capture",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Unknown => "unknown",
        }
    }
}

/// A payment intent as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Opaque provider reference.
    pub id: String,
    /// Secret handed to the front end to drive the payment UI.
    pub client_secret: Option<String>,
    pub status: IntentStatus,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: CurrencyCode,
}

/// Inputs for creating an intent.
#[derive(Debug, Clone)]
pub struct CreateIntentRequest {
    /// Amount in minor units of `currency`.
    pub amount: i64,
    pub currency: CurrencyCode,
    /// Attached as provider metadata for reconciliation.
    pub order_id: OrderId,
}

/// Port trait for the payment provider.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Creates a new intent for the given amount and currency.
    async fn create_intent(&self, req: CreateIntentRequest)
    -> Result<PaymentIntent, GatewayError>;

    /// Retrieves the current state of an intent.
    async fn retrieve_intent(
        &self,
        currency: CurrencyCode,
        intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Cancels an intent.
    async fn cancel_intent(
        &self,
        currency: CurrencyCode,
        intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError>;
}
