//! Catalog item domain model.

use exchange_rates::CurrencyCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a catalog Item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random ItemId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ItemId from an existing UUID.
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

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A catalog entry.
///
/// Items are immutable once created: order creation references them and
/// snapshots their price, it never mutates them. Prices are minor units in
/// the catalog (base) currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: CurrencyCode,
}

impl Item {
    /// Creates a new catalog item with a generated id.
    pub fn new(
        name: String,
        description: Option<String>,
        price: i64,
        currency: CurrencyCode,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Item name cannot be empty".into(),
            ));
        }
        if price <= 0 {
            return Err(DomainError::InvalidPrice);
        }
        Ok(Self {
            id: ItemId::new(),
            name,
            description,
            price,
            currency,
        })
    }

    /// Reconstructs an item from database fields.
    pub fn from_parts(
        id: ItemId,
        name: String,
        description: Option<String>,
        price: i64,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new("Shirt".to_string(), None, 10_000, CurrencyCode::USD).unwrap();
        assert_eq!(item.name, "Shirt");
        assert_eq!(item.price, 10_000);
    }

    #[test]
    fn test_non_positive_price_fails() {
        let result = Item::new("Free".to_string(), None, 0, CurrencyCode::USD);
        assert!(matches!(result, Err(DomainError::InvalidPrice)));
    }

    #[test]
    fn test_empty_name_fails() {
        let result = Item::new("  ".to_string(), None, 100, CurrencyCode::USD);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }
}
