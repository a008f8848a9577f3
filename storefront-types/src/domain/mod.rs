//! Domain models for the storefront service.

pub mod cart;
pub mod item;
pub mod order;
pub mod pricing;
pub mod rules;

pub use cart::{Cart, CartId, CartLineItem};
pub use item::{Item, ItemId};
pub use order::{Order, OrderId, OrderLineItem, PaymentStatus};
pub use pricing::{Percentage, PriceBreakdown, price_lines};
pub use rules::{PricingRule, RuleId, RuleKind};
