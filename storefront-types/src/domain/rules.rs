//! Discount and tax rules.
//!
//! Both kinds share one shape: a named percentage with an active flag. The
//! system-wide invariant (at most one active rule per kind) is enforced by
//! the repository's atomic `activate_rule` operation, never in handler code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::Percentage;
use crate::error::DomainError;

/// Unique identifier for a PricingRule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(Uuid);

impl RuleId {
    /// Creates a new random RuleId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RuleId from an existing UUID.
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

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RuleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which side of the pricing computation a rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Discount,
    Tax,
}

impl RuleKind {
    /// Uppercase tag used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Discount => "DISCOUNT",
            RuleKind::Tax => "TAX",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "DISCOUNT" => Some(RuleKind::Discount),
            "TAX" => Some(RuleKind::Tax),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named discount or tax percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: RuleId,
    pub kind: RuleKind,
    pub name: String,
    #[serde(
        serialize_with = "serialize_percentage",
        deserialize_with = "deserialize_percentage"
    )]
    pub percentage: Percentage,
    pub is_active: bool,
}

impl PricingRule {
    /// Creates a new inactive rule with a generated id.
    pub fn new(kind: RuleKind, name: String, percentage: Percentage) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Rule name cannot be empty".into(),
            ));
        }
        Ok(Self {
            id: RuleId::new(),
            kind,
            name,
            percentage,
            is_active: false,
        })
    }

    /// Reconstructs a rule from database fields.
    pub fn from_parts(
        id: RuleId,
        kind: RuleKind,
        name: String,
        percentage: Percentage,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            percentage,
            is_active,
        }
    }
}

fn serialize_percentage<S: serde::Serializer>(
    pct: &Percentage,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(pct.as_percent())
}

fn deserialize_percentage<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Percentage, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Percentage::from_percent(value).map_err(serde::de::Error::custom)
}
