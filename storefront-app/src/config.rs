//! Configuration loading from environment.

use std::env;

use exchange_rates::{CurrencyCode, RateTable};
use storefront_gateway::{DEFAULT_API_BASE, GatewayConfig};

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub base_currency: CurrencyCode,
    pub second_currency: CurrencyCode,
    pub currency_rate: f64,
    pub stripe_api_base: String,
    pub stripe_secret_key: String,
    pub stripe_secret_key_eur: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let base_currency: CurrencyCode = env::var("BASE_CURRENCY")
            .unwrap_or_else(|_| "USD".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("BASE_CURRENCY: {e}"))?;
        let second_currency: CurrencyCode = env::var("SECOND_CURRENCY")
            .unwrap_or_else(|_| "EUR".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("SECOND_CURRENCY: {e}"))?;

        let currency_rate: f64 = env::var("CURRENCY_RATE")
            .unwrap_or_else(|_| "0.90".to_string())
            .parse()?;

        let stripe_api_base =
            env::var("STRIPE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable is required"))?;
        let stripe_secret_key_eur = env::var("STRIPE_SECRET_KEY_EUR").map_err(|_| {
            anyhow::anyhow!("STRIPE_SECRET_KEY_EUR environment variable is required")
        })?;

        Ok(Self {
            port,
            database_url,
            base_currency,
            second_currency,
            currency_rate,
            stripe_api_base,
            stripe_secret_key,
            stripe_secret_key_eur,
        })
    }

    /// The static conversion table, base -> secondary.
    pub fn rate_table(&self) -> anyhow::Result<RateTable> {
        RateTable::new(self.base_currency, self.second_currency, self.currency_rate)
            .map_err(|e| anyhow::anyhow!("invalid currency configuration: {e}"))
    }

    /// The per-currency gateway credentials.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.stripe_api_base.clone())
            .with_secret_key(self.base_currency, self.stripe_secret_key.clone())
            .with_secret_key(self.second_currency, self.stripe_secret_key_eur.clone())
    }
}
