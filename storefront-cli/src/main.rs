//! Storefront CLI
//!
//! Command-line interface for the Storefront API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use exchange_rates::CurrencyCode;
use storefront_client::StorefrontClient;
use storefront_types::{CartId, ItemId, OrderId, RuleId, RuleKind};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Storefront API
    #[arg(
        long,
        env = "STOREFRONT_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog operations
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartCommands,
    },
    /// Order operations
    Order {
        #[command(subcommand)]
        action: OrderCommands,
    },
    /// Buy a single item
    Buy {
        /// Item to buy
        item_id: ItemId,
        /// Order currency (USD or EUR)
        #[arg(long)]
        cur: Option<CurrencyCode>,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Discount and tax rules
    Rule {
        #[command(subcommand)]
        action: RuleCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum ItemCommands {
    /// List catalog items
    List,
    /// Show one item
    Get { id: ItemId },
    /// Create a catalog item
    Create {
        /// Display name
        name: String,
        /// Price in minor units (cents)
        price: i64,
        #[arg(long)]
        description: Option<String>,
        /// Catalog currency (defaults to the server's base currency)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
}

#[derive(Subcommand)]
enum CartCommands {
    /// Create an empty cart
    Create,
    /// Show a cart
    Show { id: CartId },
    /// Add an item to a cart
    Add {
        id: CartId,
        item_id: ItemId,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Delete a cart
    Delete { id: CartId },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// Create an order from a cart
    Create {
        cart_id: CartId,
        /// Order currency (USD or EUR)
        #[arg(long)]
        cur: Option<CurrencyCode>,
    },
    /// Show an order
    Get { id: OrderId },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Create a payment session for an order
    Session { order_id: OrderId },
    /// Confirm an order's payment
    Confirm { order_id: OrderId },
    /// Cancel an order
    Cancel { order_id: OrderId },
}

#[derive(Subcommand)]
enum RuleCommands {
    /// Create a rule (inactive until activated)
    Create {
        /// "discount" or "tax"
        kind: String,
        name: String,
        /// Percentage in [0, 100]
        percentage: f64,
    },
    /// List rules
    List {
        /// Filter: "discount" or "tax"
        #[arg(long)]
        kind: Option<String>,
    },
    /// Activate a rule (deactivates all others of its kind)
    Activate { id: RuleId },
}

fn parse_kind(raw: &str) -> Result<RuleKind> {
    RuleKind::from_tag(raw)
        .ok_or_else(|| anyhow::anyhow!("rule kind must be 'discount' or 'tax', got '{raw}'"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let client = StorefrontClient::new(&cli.api_url);

    match cli.command {
        Commands::Item { action } => match action {
            ItemCommands::List => print_json(&client.list_items().await?)?,
            ItemCommands::Get { id } => print_json(&client.get_item(id).await?)?,
            ItemCommands::Create {
                name,
                price,
                description,
                currency,
            } => print_json(&client.create_item(&name, description, price, currency).await?)?,
        },
        Commands::Cart { action } => match action {
            CartCommands::Create => print_json(&client.create_cart().await?)?,
            CartCommands::Show { id } => print_json(&client.get_cart(id).await?)?,
            CartCommands::Add {
                id,
                item_id,
                quantity,
            } => print_json(&client.add_cart_item(id, item_id, quantity).await?)?,
            CartCommands::Delete { id } => {
                client.delete_cart(id).await?;
                println!("Cart {id} deleted");
            }
        },
        Commands::Order { action } => match action {
            OrderCommands::Create { cart_id, cur } => {
                print_json(&client.create_order(cart_id, cur).await?)?
            }
            OrderCommands::Get { id } => print_json(&client.get_order(id).await?)?,
        },
        Commands::Buy { item_id, cur } => print_json(&client.buy_item(item_id, cur).await?)?,
        Commands::Payment { action } => match action {
            PaymentCommands::Session { order_id } => {
                print_json(&client.create_payment_session(order_id).await?)?
            }
            PaymentCommands::Confirm { order_id } => {
                print_json(&client.confirm_payment(order_id).await?)?
            }
            PaymentCommands::Cancel { order_id } => {
                print_json(&client.cancel_payment(order_id).await?)?
            }
        },
        Commands::Rule { action } => match action {
            RuleCommands::Create {
                kind,
                name,
                percentage,
            } => {
                let kind = parse_kind(&kind)?;
                print_json(&client.create_rule(kind, &name, percentage).await?)?
            }
            RuleCommands::List { kind } => {
                let kind = kind.as_deref().map(parse_kind).transpose()?;
                print_json(&client.list_rules(kind).await?)?
            }
            RuleCommands::Activate { id } => print_json(&client.activate_rule(id).await?)?,
        },
        Commands::Health => {
            let healthy = client.health().await?;
            println!("{}", if healthy { "healthy" } else { "unhealthy" });
        }
    }

    Ok(())
}
