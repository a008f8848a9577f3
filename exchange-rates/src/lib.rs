//! Currency codes and static-rate conversion for the storefront.
//!
//! The shop supports exactly two currencies: a base currency that catalog
//! prices are denominated in, and a secondary currency reachable through one
//! configured rate. There is no inverse conversion path; the system only
//! ever converts catalog prices into an order's target currency.
//!
//! Amounts are i64 minor units (cents). Fractional results round half to
//! even so repeated pricing runs reproduce the same stored values.
//!
//! # Example
//! ```
//! use exchange_rates::{CurrencyCode, RateTable};
//!
//! let rates = RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.90).unwrap();
//! assert_eq!(rates.convert(10_000, CurrencyCode::USD, CurrencyCode::EUR).unwrap(), 9_000);
//! assert_eq!(rates.convert(10_000, CurrencyCode::EUR, CurrencyCode::EUR).unwrap(), 10_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for currency and rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Rate not available for {0} -> {1}")]
    RateNotAvailable(CurrencyCode, CurrencyCode),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(f64),
}

/// Currencies the shop accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    USD,
    EUR,
}

impl CurrencyCode {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "$",
            CurrencyCode::EUR => "€",
        }
    }

    /// Minor units per major unit (both supported currencies use 2 decimals).
    pub fn minor_per_major(&self) -> i64 {
        100
    }

    pub fn all() -> &'static [CurrencyCode] {
        &[CurrencyCode::USD, CurrencyCode::EUR]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(CurrencyCode::USD),
            "EUR" => Ok(CurrencyCode::EUR),
            other => Err(ExchangeError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// The configured conversion table: one static rate from the base currency to
/// the quote (secondary) currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    base: CurrencyCode,
    quote: CurrencyCode,
    rate: f64,
}

impl RateTable {
    /// Builds a table for `base -> quote` at the given rate.
    ///
    /// The rate must be finite and positive, and the two currencies distinct.
    pub fn new(base: CurrencyCode, quote: CurrencyCode, rate: f64) -> Result<Self, ExchangeError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ExchangeError::InvalidRate(rate));
        }
        if base == quote {
            return Err(ExchangeError::RateNotAvailable(base, quote));
        }
        Ok(Self { base, quote, rate })
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn quote(&self) -> CurrencyCode {
        self.quote
    }

    /// The rate applied when converting `from -> to`.
    pub fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<f64, ExchangeError> {
        if from == to {
            return Ok(1.0);
        }
        if from == self.base && to == self.quote {
            return Ok(self.rate);
        }
        Err(ExchangeError::RateNotAvailable(from, to))
    }

    /// Converts an amount in minor units between supported currencies.
    ///
    /// Same-currency conversion is the identity. Only the configured
    /// `base -> quote` direction carries a rate.
    pub fn convert(
        &self,
        amount: i64,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<i64, ExchangeError> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.rate(from, to)?;
        Ok(((amount as f64) * rate).round_ties_even() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.90).unwrap()
    }

    #[test]
    fn test_same_currency_is_identity() {
        let rates = table();
        assert_eq!(
            rates
                .convert(12_345, CurrencyCode::USD, CurrencyCode::USD)
                .unwrap(),
            12_345
        );
        assert_eq!(
            rates
                .convert(12_345, CurrencyCode::EUR, CurrencyCode::EUR)
                .unwrap(),
            12_345
        );
    }

    #[test]
    fn test_base_to_quote_applies_rate() {
        let rates = table();
        // $100.00 at 0.90 -> €90.00
        assert_eq!(
            rates
                .convert(10_000, CurrencyCode::USD, CurrencyCode::EUR)
                .unwrap(),
            9_000
        );
    }

    #[test]
    fn test_inverse_direction_has_no_rate() {
        let rates = table();
        let result = rates.convert(9_000, CurrencyCode::EUR, CurrencyCode::USD);
        assert!(matches!(result, Err(ExchangeError::RateNotAvailable(_, _))));
    }

    #[test]
    fn test_fractional_result_rounds_half_even() {
        let rates = RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.5).unwrap();
        // 1.5 minor units rounds to 2, 2.5 also rounds to 2
        assert_eq!(
            rates
                .convert(3, CurrencyCode::USD, CurrencyCode::EUR)
                .unwrap(),
            2
        );
        assert_eq!(
            rates
                .convert(5, CurrencyCode::USD, CurrencyCode::EUR)
                .unwrap(),
            2
        );
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(matches!(
            RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.0),
            Err(ExchangeError::InvalidRate(_))
        ));
        assert!(matches!(
            RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, f64::NAN),
            Err(ExchangeError::InvalidRate(_))
        ));
        assert!(matches!(
            RateTable::new(CurrencyCode::USD, CurrencyCode::USD, 1.0),
            Err(ExchangeError::RateNotAvailable(_, _))
        ));
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!(matches!(
            "GBP".parse::<CurrencyCode>(),
            Err(ExchangeError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::USD.to_string(), "USD");
        assert_eq!(CurrencyCode::EUR.to_string(), "EUR");
    }

    #[test]
    fn test_rate_lookup() {
        let rates = table();
        assert_eq!(
            rates.rate(CurrencyCode::USD, CurrencyCode::EUR).unwrap(),
            0.90
        );
        assert_eq!(
            rates.rate(CurrencyCode::EUR, CurrencyCode::EUR).unwrap(),
            1.0
        );
        assert!(rates.rate(CurrencyCode::EUR, CurrencyCode::USD).is_err());
    }
}
