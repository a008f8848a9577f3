//! Client example demonstrating the shop flow against a running server.
//!
//! Run with: cargo run -p storefront-app --example client_example
//!
//! Payment sessions need real gateway credentials; this example covers the
//! catalog/cart/order flow plus the one payment operation that never talks
//! to the gateway (cancelling an order without a session).

use std::net::SocketAddr;

use tempfile::tempdir;
use tokio::net::TcpListener;

use exchange_rates::{CurrencyCode, RateTable};
use storefront_client::StorefrontClient;
use storefront_gateway::{GatewayConfig, StripeGateway};
use storefront_hex::{CheckoutService, inbound::HttpServer};
use storefront_repo::build_repo;
use storefront_types::RuleKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("storefront.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = build_repo(&db_url).await?;

    // Gateway with placeholder keys; the flows below never reach it
    let gateway = StripeGateway::new(
        GatewayConfig::new("http://127.0.0.1:1")
            .with_secret_key(CurrencyCode::USD, "sk_test_placeholder")
            .with_secret_key(CurrencyCode::EUR, "sk_test_placeholder"),
    );
    let rates = RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.90)?;

    // Start server in background
    let service = CheckoutService::new(repo, gateway, rates);
    let server = HttpServer::new(service);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = StorefrontClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: catalog -> cart -> order -> cancel
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // Seed the catalog
    let mug = client.create_item("Mug", None, 1_000, None).await?;
    println!("✅ Created item: {} (id={})", mug.name, mug.id);
    let lamp = client
        .create_item("Lamp", Some("Desk lamp".to_string()), 10_000, None)
        .await?;
    println!("✅ Created item: {} (id={})", lamp.name, lamp.id);

    // 10% discount + 5% tax
    let discount = client
        .create_rule(RuleKind::Discount, "Launch discount", 10.0)
        .await?;
    client.activate_rule(discount.id).await?;
    let tax = client.create_rule(RuleKind::Tax, "VAT", 5.0).await?;
    client.activate_rule(tax.id).await?;
    println!("✅ Activated 10% discount and 5% tax");

    // Build a cart
    let cart = client.create_cart().await?;
    client.add_cart_item(cart.id, mug.id, 2).await?;
    client.add_cart_item(cart.id, lamp.id, 1).await?;
    let cart = client.get_cart(cart.id).await?;
    println!(
        "✅ Cart {} holds {} lines, ${:.2}",
        cart.id,
        cart.items.len(),
        cart.total_price as f64 / 100.0
    );

    // Turn the cart into a priced EUR order
    let order = client
        .create_order(cart.id, Some(CurrencyCode::EUR))
        .await?;
    println!(
        "✅ Order {}: subtotal €{:.2}, discount €{:.2}, tax €{:.2}, total €{:.2}",
        order.id,
        order.subtotal as f64 / 100.0,
        order.discount_amount as f64 / 100.0,
        order.tax_amount as f64 / 100.0,
        order.total as f64 / 100.0
    );

    // The cart was consumed by the build
    let gone = client.get_cart(cart.id).await;
    assert!(gone.is_err());
    println!("✅ Cart consumed by the order build");

    // Buy a single item directly
    let single = client.buy_item(lamp.id, Some(CurrencyCode::EUR)).await?;
    println!(
        "✅ Single-item order {}: total €{:.2}",
        single.id,
        single.total as f64 / 100.0
    );

    // Cancel the order (no session yet, so no gateway round-trip)
    let cancelled = client.cancel_payment(order.id).await?;
    println!("✅ {}", cancelled.message);

    let order = client.get_order(order.id).await?;
    println!("   Order status now: {:?}", order.payment_status);

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
