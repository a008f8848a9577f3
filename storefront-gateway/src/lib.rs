//! # Storefront Gateway
//!
//! Outbound adapter implementing the `PaymentGateway` port against the
//! Stripe payment-intents API.
//!
//! The shop runs one provider account per supported currency, so every call
//! selects the credential for the currency it is given. The currency always
//! comes from the order's stored value, never from request input, and no
//! client state is shared between calls.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use storefront_types::{
    CreateIntentRequest, CurrencyCode, GatewayError, IntentStatus, PaymentGateway, PaymentIntent,
};

/// Production API base.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-currency credential configuration for the provider.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    api_base: String,
    secret_keys: HashMap<CurrencyCode, String>,
}

impl GatewayConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_keys: HashMap::new(),
        }
    }

    /// Registers the secret key used for orders in `currency`.
    pub fn with_secret_key(mut self, currency: CurrencyCode, key: impl Into<String>) -> Self {
        self.secret_keys.insert(currency, key.into());
        self
    }

    fn secret_key(&self, currency: CurrencyCode) -> Result<&str, GatewayError> {
        self.secret_keys
            .get(&currency)
            .map(String::as_str)
            .ok_or(GatewayError::Unconfigured(currency))
    }
}

/// Stripe payment-intents adapter.
pub struct StripeGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl StripeGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    async fn handle_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<PaymentIntent, GatewayError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if status.is_success() {
            let wire: WireIntent = serde_json::from_str(&body)
                .map_err(|e| GatewayError::Provider(format!("Malformed gateway response: {e}")))?;
            wire.into_intent()
        } else {
            Err(GatewayError::Provider(provider_message(&body, status)))
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[tracing::instrument(skip(self), fields(order_id = %req.order_id, amount = req.amount, currency = %req.currency))]
    async fn create_intent(
        &self,
        req: CreateIntentRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        let key = self.config.secret_key(req.currency)?;

        let amount = req.amount.to_string();
        let currency = req.currency.code().to_lowercase();
        let order_id = req.order_id.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("amount", amount.as_str()),
            ("currency", currency.as_str()),
            ("metadata[order_id]", order_id.as_str()),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let resp = self
            .http
            .post(self.url("/v1/payment_intents"))
            .bearer_auth(key)
            .form(&params)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(resp).await
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve_intent(
        &self,
        currency: CurrencyCode,
        intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let key = self.config.secret_key(currency)?;

        let resp = self
            .http
            .get(self.url(&format!("/v1/payment_intents/{intent_id}")))
            .bearer_auth(key)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(resp).await
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_intent(
        &self,
        currency: CurrencyCode,
        intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let key = self.config.secret_key(currency)?;

        let resp = self
            .http
            .post(self.url(&format!("/v1/payment_intents/{intent_id}/cancel")))
            .bearer_auth(key)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(resp).await
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable(err.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
    amount: i64,
    currency: String,
}

impl WireIntent {
    fn into_intent(self) -> Result<PaymentIntent, GatewayError> {
        let currency: CurrencyCode = self.currency.parse().map_err(|_| {
            GatewayError::Provider(format!(
                "Unsupported currency in gateway response: {}",
                self.currency
            ))
        })?;
        Ok(PaymentIntent {
            id: self.id,
            client_secret: self.client_secret,
            status: IntentStatus::from_wire(&self.status),
            amount: self.amount,
            currency,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: Option<String>,
}

fn provider_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<WireErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| format!("Gateway returned HTTP {status}"))
}
