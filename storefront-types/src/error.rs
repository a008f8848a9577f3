//! Error types for the storefront service.

use exchange_rates::ExchangeError;

use crate::domain::{CartId, ItemId};

/// Domain-level errors (business logic violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Quantity must be positive")]
    InvalidQuantity,

    #[error("Percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(f64),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    // Payment state machine guard rejections. The messages are part of the
    // API contract and must not change.
    #[error("Order is cancelled")]
    OrderCancelled,

    #[error("Order already completed")]
    OrderCompleted,

    #[error("Cannot cancel processed order")]
    CannotCancelProcessed,

    #[error("No cart with the given ID was found: {0}")]
    CartNotFound(CartId),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// True for guard-clause rejections of the payment state machine.
    pub fn is_state_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::OrderCancelled
                | DomainError::OrderCompleted
                | DomainError::CannotCancelProcessed
        )
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Payment gateway errors.
///
/// `Provider` carries the provider's own message; `Unavailable` covers
/// timeouts and transport failures, which are retryable by the caller. Both
/// surface to clients without any local state mutation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Provider(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("No gateway credentials configured for {0}")]
    Unconfigured(exchange_rates::CurrencyCode),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes: `BadRequest`, `InvalidState` and
/// `Gateway` are 400, `NotFound` is 404, `Internal` is 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        if err.is_state_rejection() {
            AppError::InvalidState(err.to_string())
        } else {
            AppError::BadRequest(err.to_string())
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Provider(msg) => AppError::Gateway(msg),
            GatewayError::Unavailable(msg) => AppError::Gateway(msg),
            GatewayError::Unconfigured(currency) => {
                AppError::Internal(format!("No gateway credentials configured for {currency}"))
            }
        }
    }
}
