//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use exchange_rates::{CurrencyCode, RateTable};

use crate::domain::{
    Cart, CartId, CartLineItem, Item, ItemId, Order, OrderId, PaymentStatus, PricingRule, RuleId,
    RuleKind,
};
use crate::dto::CreateItemFields;
use crate::error::RepoError;

/// What an order is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// All lines of a cart; the cart is consumed on success.
    Cart(CartId),
    /// A single item with quantity 1.
    SingleItem(ItemId),
}

/// The main repository port for shop operations.
///
/// `build_order` and the payment-status writes carry the consistency
/// guarantees of the core: order building is a single all-or-nothing
/// transaction, and status writes are compare-and-swap so concurrent payment
/// operations can never both land a terminal transition.
#[async_trait::async_trait]
pub trait ShopRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new catalog item.
    async fn create_item(&self, fields: CreateItemFields) -> Result<Item, RepoError>;

    /// Gets an item by ID.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError>;

    /// Lists all items.
    async fn list_items(&self) -> Result<Vec<Item>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Carts (pre-order staging)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new empty cart.
    async fn create_cart(&self) -> Result<Cart, RepoError>;

    /// Gets a cart with its lines.
    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError>;

    /// Adds an item to a cart. Adding an item already in the cart sums the
    /// quantities on the existing line.
    async fn add_cart_item(
        &self,
        cart_id: CartId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<CartLineItem, RepoError>;

    /// Deletes a cart and its lines. Returns false if the cart did not exist.
    async fn delete_cart(&self, id: CartId) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Orders (MUST be atomic)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Builds a fully-priced order in one transaction: snapshots converted
    /// unit prices, persists the lines, runs the pricing engine under the
    /// currently active rules, writes the totals, and (for a cart source)
    /// consumes the cart. Any failure rolls everything back.
    async fn build_order(
        &self,
        source: OrderSource,
        currency: CurrencyCode,
        rates: &RateTable,
    ) -> Result<Order, RepoError>;

    /// Gets an order with its lines.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment state (compare-and-swap writes)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores the gateway intent reference, provided the order is still in
    /// one of the `expected_from` statuses. Fails with `Conflict` otherwise.
    async fn set_payment_intent(
        &self,
        id: OrderId,
        intent_id: &str,
        expected_from: &[PaymentStatus],
    ) -> Result<(), RepoError>;

    /// Transitions the payment status, provided the order is still in one of
    /// the `expected_from` statuses. Fails with `Conflict` otherwise, so at
    /// most one of two racing terminal transitions survives.
    async fn transition_payment_status(
        &self,
        id: OrderId,
        expected_from: &[PaymentStatus],
        to: PaymentStatus,
    ) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Pricing rules
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new (inactive) rule.
    async fn create_rule(&self, rule: PricingRule) -> Result<PricingRule, RepoError>;

    /// Lists rules of one kind.
    async fn list_rules(&self, kind: RuleKind) -> Result<Vec<PricingRule>, RepoError>;

    /// Returns the currently active rule of a kind, if any.
    async fn active_rule(&self, kind: RuleKind) -> Result<Option<PricingRule>, RepoError>;

    /// Activates a rule, atomically deactivating every other rule of the
    /// same kind. After this call exactly one rule of the kind is active.
    async fn activate_rule(&self, id: RuleId) -> Result<PricingRule, RepoError>;
}
