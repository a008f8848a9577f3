//! Cart staging area: a mutable list of (item, quantity) pairs that feeds
//! order creation. A successful cart-sourced order build consumes the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;

/// Unique identifier for a Cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(Uuid);

impl CartId {
    /// Creates a new random CartId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CartId from an existing UUID.
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

impl Default for CartId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CartId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: Uuid,
    pub item: Item,
    pub quantity: u32,
}

impl CartLineItem {
    /// Line total in the catalog currency.
    pub fn total_price(&self) -> i64 {
        self.item.price.saturating_mul(self.quantity as i64)
    }
}

/// A pre-order staging list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart with a generated id.
    pub fn new() -> Self {
        Self {
            id: CartId::new(),
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Sum of all line totals, in the catalog currency.
    pub fn total_price(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.total_price()))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_rates::CurrencyCode;

    #[test]
    fn test_cart_total_price() {
        let item = Item::new("Mug".to_string(), None, 1_500, CurrencyCode::USD).unwrap();
        let mut cart = Cart::new();
        cart.items.push(CartLineItem {
            id: Uuid::new_v4(),
            item: item.clone(),
            quantity: 3,
        });
        cart.items.push(CartLineItem {
            id: Uuid::new_v4(),
            item,
            quantity: 1,
        });
        assert_eq!(cart.total_price(), 6_000);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total_price(), 0);
    }
}
