//! Checkout Application Service
//!
//! Orchestrates order building and the payment state machine through the
//! repository and gateway ports. Contains NO infrastructure logic - pure
//! business orchestration.
//!
//! Every payment operation follows the same shape: load the order, run the
//! state guard, talk to the gateway with the credentials for the order's
//! stored currency, then write the new state back with a compare-and-swap so
//! a concurrent operation on the same order cannot be silently overwritten.

use exchange_rates::{CurrencyCode, RateTable};

use storefront_types::{
    AppError, Cart, CartId, CartLineItem, CreateIntentRequest, CreateItemFields,
    CreateItemRequest, CreateRuleRequest, Item, ItemId, Order, OrderId, OrderSource,
    PaymentGateway, PaymentStatus, Percentage, PricingRule, RepoError, RuleId, RuleKind,
    ShopRepository, dto,
};

/// Statuses a payment operation may start from: everything non-terminal.
/// A `Failed` order can retry create-session/confirm and can be cancelled.
const NON_TERMINAL: &[PaymentStatus] = &[PaymentStatus::Pending, PaymentStatus::Failed];

/// Application service for the shop.
///
/// Generic over `R: ShopRepository` and `G: PaymentGateway` - the adapters
/// are injected at compile time. This enables:
/// - Swapping the store or provider without code changes
/// - Testing with in-memory mocks
/// - Compile-time checks for port implementation
pub struct CheckoutService<R: ShopRepository, G: PaymentGateway> {
    repo: R,
    gateway: G,
    rates: RateTable,
}

impl<R: ShopRepository, G: PaymentGateway> CheckoutService<R, G> {
    /// Creates a new checkout service with the given adapters.
    pub fn new(repo: R, gateway: G, rates: RateTable) -> Self {
        Self {
            repo,
            gateway,
            rates,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the payment gateway adapter.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The configured conversion table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a catalog item.
    pub async fn create_item(&self, req: CreateItemRequest) -> Result<Item, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::BadRequest("Item name cannot be empty".into()));
        }
        if req.price <= 0 {
            return Err(AppError::BadRequest("Price must be positive".into()));
        }
        let currency = match req.currency {
            Some(code) => parse_currency(&code)?,
            None => self.rates.base(),
        };

        self.repo
            .create_item(CreateItemFields {
                name: req.name,
                description: req.description,
                price: req.price,
                currency,
            })
            .await
            .map_err(Into::into)
    }

    /// Gets an item by ID.
    pub async fn get_item(&self, id: ItemId) -> Result<Item, AppError> {
        self.repo
            .get_item(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Item {}", id))))
    }

    /// Lists all items.
    pub async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        self.repo.list_items().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Carts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an empty cart.
    pub async fn create_cart(&self) -> Result<Cart, AppError> {
        self.repo.create_cart().await.map_err(Into::into)
    }

    /// Gets a cart by ID.
    pub async fn get_cart(&self, id: CartId) -> Result<Cart, AppError> {
        self.repo
            .get_cart(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Cart {}", id))))
    }

    /// Adds an item to a cart.
    pub async fn add_cart_item(
        &self,
        cart_id: CartId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<CartLineItem, AppError> {
        if quantity == 0 {
            return Err(AppError::BadRequest("Quantity must be positive".into()));
        }

        self.repo
            .add_cart_item(cart_id, item_id, quantity)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => AppError::NotFound(format!("Cart {}", cart_id)),
                other => other.into(),
            })
    }

    /// Deletes a cart.
    pub async fn delete_cart(&self, id: CartId) -> Result<(), AppError> {
        let deleted = self.repo.delete_cart(id).await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Cart {}", id)))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Order building
    // ─────────────────────────────────────────────────────────────────────────────

    /// Builds an order for a single item (quantity 1) in the given currency.
    pub async fn buy_item(
        &self,
        item_id: ItemId,
        currency: CurrencyCode,
    ) -> Result<Order, AppError> {
        self.repo
            .build_order(OrderSource::SingleItem(item_id), currency, &self.rates)
            .await
            .map_err(Into::into)
    }

    /// Builds an order from a cart, consuming the cart.
    pub async fn create_order(
        &self,
        cart_id: CartId,
        currency: CurrencyCode,
    ) -> Result<Order, AppError> {
        self.repo
            .build_order(OrderSource::Cart(cart_id), currency, &self.rates)
            .await
            .map_err(Into::into)
    }

    /// Gets an order by ID.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, AppError> {
        self.repo
            .get_order(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Order {}", id))))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment state machine
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a payment session: a provider intent for the order's total,
    /// whose reference is stored on the order. The status stays as it was.
    ///
    /// Repeated calls while the order is non-terminal simply overwrite the
    /// stored reference; there is no idempotency guard.
    pub async fn create_payment_session(
        &self,
        order_id: OrderId,
    ) -> Result<dto::PaymentSessionResponse, AppError> {
        let order = self.get_order(order_id).await?;
        order.ensure_payable()?;

        let intent = self
            .gateway
            .create_intent(CreateIntentRequest {
                amount: order.total,
                currency: order.order_currency,
                order_id,
            })
            .await?;

        self.repo
            .set_payment_intent(order_id, &intent.id, NON_TERMINAL)
            .await?;

        tracing::info!(%order_id, intent_id = %intent.id, "payment session created");

        Ok(dto::PaymentSessionResponse {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
            amount: order.total,
            currency: order.order_currency,
        })
    }

    /// Confirms an order against the gateway: `Complete` if the provider
    /// reports the intent settled, `Failed` otherwise.
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
    ) -> Result<dto::ConfirmPaymentResponse, AppError> {
        let order = self.get_order(order_id).await?;
        order.ensure_payable()?;

        let intent_ref = order.payment_intent_id.as_deref().ok_or_else(|| {
            AppError::BadRequest("Order has no payment session to confirm".into())
        })?;

        let intent = self
            .gateway
            .retrieve_intent(order.order_currency, intent_ref)
            .await?;

        let settled = intent.status.is_settled();
        let new_status = if settled {
            PaymentStatus::Complete
        } else {
            PaymentStatus::Failed
        };

        // Re-validate right before the write: a concurrent operation may
        // have landed a terminal status while the gateway call ran.
        self.repo
            .transition_payment_status(order_id, NON_TERMINAL, new_status)
            .await?;

        tracing::info!(%order_id, status = %new_status, "payment confirmed");

        Ok(dto::ConfirmPaymentResponse {
            status: if settled { "success" } else { "failed" }.to_string(),
            message: if settled {
                "Payment confirmed successfully".to_string()
            } else {
                format!("Payment failed: {}", intent.status.as_str())
            },
            order_id,
        })
    }

    /// Cancels an order. The gateway intent is cancelled only when one
    /// exists and the order is still `Pending`; a `Failed` order is
    /// cancelled locally without a gateway call.
    pub async fn cancel_payment(
        &self,
        order_id: OrderId,
    ) -> Result<dto::CancelPaymentResponse, AppError> {
        let order = self.get_order(order_id).await?;
        order.ensure_cancellable()?;

        if let Some(intent_ref) = order.payment_intent_id.as_deref() {
            if order.payment_status == PaymentStatus::Pending {
                self.gateway
                    .cancel_intent(order.order_currency, intent_ref)
                    .await?;
            }
        }

        self.repo
            .transition_payment_status(order_id, NON_TERMINAL, PaymentStatus::Cancelled)
            .await?;

        tracing::info!(%order_id, "payment cancelled");

        Ok(dto::CancelPaymentResponse {
            message: "Payment cancelled successfully".to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pricing rules
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an inactive discount or tax rule.
    pub async fn create_rule(&self, req: CreateRuleRequest) -> Result<PricingRule, AppError> {
        let kind = RuleKind::from_tag(&req.kind).ok_or_else(|| {
            AppError::BadRequest("Rule kind must be 'discount' or 'tax'".into())
        })?;
        let percentage = Percentage::from_percent(req.percentage)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let rule = PricingRule::new(kind, req.name, percentage)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        self.repo.create_rule(rule).await.map_err(Into::into)
    }

    /// Lists rules of one kind.
    pub async fn list_rules(&self, kind: RuleKind) -> Result<Vec<PricingRule>, AppError> {
        self.repo.list_rules(kind).await.map_err(Into::into)
    }

    /// Activates a rule; every other rule of the same kind is deactivated in
    /// the same atomic operation.
    pub async fn activate_rule(&self, id: RuleId) -> Result<PricingRule, AppError> {
        self.repo.activate_rule(id).await.map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(format!("Rule {}", id)),
            other => other.into(),
        })
    }
}

/// Parses a currency code from request input.
pub fn parse_currency(code: &str) -> Result<CurrencyCode, AppError> {
    code.parse()
        .map_err(|e: exchange_rates::ExchangeError| AppError::BadRequest(e.to_string()))
}
