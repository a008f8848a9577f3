//! # Storefront Types
//!
//! Domain types and port traits for the storefront order/payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Item, Cart, Order, PricingRule) and the
//!   pricing engine
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository, gateway and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Cart, CartId, CartLineItem, Item, ItemId, Order, OrderId, OrderLineItem, PaymentStatus,
    Percentage, PriceBreakdown, PricingRule, RuleId, RuleKind, price_lines,
};
pub use dto::*;
pub use error::{AppError, DomainError, GatewayError, RepoError};
pub use ports::{
    CreateIntentRequest, IntentStatus, OrderSource, PaymentGateway, PaymentIntent, ShopRepository,
};

// The currency vocabulary comes from the exchange-rates crate.
pub use exchange_rates::{CurrencyCode, ExchangeError, RateTable};
