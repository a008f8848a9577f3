//! Order pricing engine.
//!
//! Pure arithmetic over minor units: no IO, no error conditions. Callers
//! persist the result. Percentages apply with round-half-to-even so repeated
//! runs over the same inputs always reproduce the same stored values.

use serde::Serialize;
use std::cmp::Ordering;

use crate::error::DomainError;

/// A percentage in [0, 100], stored as basis points (1% = 100 bp) so that
/// two-decimal percentages stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentage(i64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);

    /// Creates a percentage from a decimal value, e.g. `10.5` for 10.5%.
    pub fn from_percent(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(DomainError::InvalidPercentage(value));
        }
        Ok(Self((value * 100.0).round() as i64))
    }

    /// Creates a percentage from basis points, e.g. `1050` for 10.5%.
    pub fn from_basis_points(bp: i64) -> Result<Self, DomainError> {
        if !(0..=10_000).contains(&bp) {
            return Err(DomainError::InvalidPercentage(bp as f64 / 100.0));
        }
        Ok(Self(bp))
    }

    pub fn basis_points(&self) -> i64 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Applies the percentage to a non-negative amount of minor units,
    /// rounding half to even.
    pub fn apply_to(&self, amount: i64) -> i64 {
        let product = amount as i128 * self.0 as i128;
        let quotient = product / 10_000;
        let remainder = product % 10_000;
        let rounded = match (remainder * 2).cmp(&10_000) {
            Ordering::Less => quotient,
            Ordering::Greater => quotient + 1,
            Ordering::Equal => {
                if quotient % 2 == 0 {
                    quotient
                } else {
                    quotient + 1
                }
            }
        };
        rounded as i64
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.as_percent())
        }
    }
}

/// The four computed monetary fields of an order, in minor units.
///
/// Invariant: `total == subtotal - discount_amount + tax_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: i64,
    pub discount_amount: i64,
    pub tax_amount: i64,
    pub total: i64,
}

impl PriceBreakdown {
    pub const ZERO: PriceBreakdown = PriceBreakdown {
        subtotal: 0,
        discount_amount: 0,
        tax_amount: 0,
        total: 0,
    };
}

/// Prices an ordered collection of `(quantity, unit_price)` pairs, all in a
/// single currency, under at most one discount and one tax percentage.
///
/// The discount applies to the subtotal; tax applies to the discounted
/// subtotal. An empty collection yields all zeros.
pub fn price_lines<I>(
    lines: I,
    discount: Option<Percentage>,
    tax: Option<Percentage>,
) -> PriceBreakdown
where
    I: IntoIterator<Item = (u32, i64)>,
{
    let subtotal = lines.into_iter().fold(0i64, |acc, (quantity, unit_price)| {
        acc.saturating_add(unit_price.saturating_mul(quantity as i64))
    });

    let discount_amount = discount.map_or(0, |pct| pct.apply_to(subtotal));
    let taxable = subtotal - discount_amount;
    let tax_amount = tax.map_or(0, |pct| pct.apply_to(taxable));
    let total = taxable + tax_amount;

    PriceBreakdown {
        subtotal,
        discount_amount,
        tax_amount,
        total,
    }
}
