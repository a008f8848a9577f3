//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use storefront_types::{PaymentGateway, ShopRepository};

use super::handlers::{self, AppState};
use crate::CheckoutService;
use crate::openapi::ApiDoc;
use utoipa::OpenApi;

/// HTTP Server for the Storefront API.
pub struct HttpServer<R: ShopRepository, G: PaymentGateway> {
    state: Arc<AppState<R, G>>,
}

impl<R: ShopRepository, G: PaymentGateway> HttpServer<R, G> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: CheckoutService<R, G>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api-docs/openapi.json",
                get(|| async { Json(ApiDoc::openapi()) }),
            )
            .route(
                "/api/items",
                get(handlers::list_items::<R, G>).post(handlers::create_item::<R, G>),
            )
            .route("/api/items/{id}", get(handlers::get_item::<R, G>))
            .route("/api/buy/{item_id}", get(handlers::buy_item::<R, G>))
            .route("/api/orders", post(handlers::create_order::<R, G>))
            .route("/api/orders/{id}", get(handlers::get_order::<R, G>))
            .route(
                "/api/payment/sessions",
                post(handlers::create_payment_session::<R, G>),
            )
            .route(
                "/api/payment/confirm",
                post(handlers::confirm_payment::<R, G>),
            )
            .route(
                "/api/payment/cancel",
                post(handlers::cancel_payment::<R, G>),
            )
            .route("/api/carts", post(handlers::create_cart::<R, G>))
            .route(
                "/api/carts/{id}",
                get(handlers::get_cart::<R, G>).delete(handlers::delete_cart::<R, G>),
            )
            .route(
                "/api/carts/{id}/items",
                post(handlers::add_cart_item::<R, G>),
            )
            .route(
                "/api/rules",
                get(handlers::list_rules::<R, G>).post(handlers::create_rule::<R, G>),
            )
            .route(
                "/api/rules/{id}/activate",
                post(handlers::activate_rule::<R, G>),
            )
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
