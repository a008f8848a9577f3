//! SQLite repository adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use uuid::Uuid;

use exchange_rates::{CurrencyCode, RateTable};
use storefront_types::{
    Cart, CartId, CartLineItem, CreateItemFields, DomainError, Item, ItemId, Order, OrderId,
    OrderLineItem, OrderSource, PaymentStatus, PricingRule, RepoError, RuleId, RuleKind,
    ShopRepository, price_lines,
};

use crate::types::{DbCart, DbCartLine, DbItem, DbOrder, DbOrderLine, DbRule};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

const CART_LINES_SQL: &str = r#"SELECT ci.id, ci.quantity,
       i.id AS item_id, i.name AS item_name, i.description AS item_description,
       i.price AS item_price, i.currency AS item_currency
       FROM cart_items ci JOIN items i ON i.id = ci.item_id
       WHERE ci.cart_id = ? ORDER BY ci.id"#;

const ORDER_LINES_SQL: &str = r#"SELECT oi.id, oi.quantity, oi.unit_price,
       i.id AS item_id, i.name AS item_name, i.description AS item_description,
       i.price AS item_price, i.currency AS item_currency
       FROM order_items oi JOIN items i ON i.id = oi.item_id
       WHERE oi.order_id = ? ORDER BY oi.id"#;

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        for statement in ddl.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ShopRepository for SqliteRepo {
    async fn create_item(&self, fields: CreateItemFields) -> Result<Item, RepoError> {
        let item = Item::new(fields.name, fields.description, fields.price, fields.currency)
            .map_err(RepoError::Domain)?;

        sqlx::query(
            r#"INSERT INTO items (id, name, description, price, currency) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.currency.code())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(item)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row: Option<DbItem> = sqlx::query_as(
            r#"SELECT id, name, description, price, currency FROM items WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbItem::into_domain).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        let rows: Vec<DbItem> = sqlx::query_as(
            r#"SELECT id, name, description, price, currency FROM items ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbItem::into_domain).collect()
    }

    async fn create_cart(&self) -> Result<Cart, RepoError> {
        let cart = Cart::new();

        sqlx::query(r#"INSERT INTO carts (id, created_at) VALUES (?, ?)"#)
            .bind(cart.id.to_string())
            .bind(cart.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(cart)
    }

    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError> {
        let id_str = id.to_string();

        let row: Option<DbCart> =
            sqlx::query_as(r#"SELECT id, created_at FROM carts WHERE id = ?"#)
                .bind(&id_str)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        let Some(cart_row) = row else {
            return Ok(None);
        };

        let lines: Vec<DbCartLine> = sqlx::query_as(CART_LINES_SQL)
            .bind(&id_str)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let items = lines
            .into_iter()
            .map(DbCartLine::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        cart_row.into_domain(items).map(Some)
    }

    async fn add_cart_item(
        &self,
        cart_id: CartId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<CartLineItem, RepoError> {
        let cart_id_str = cart_id.to_string();
        let item_id_str = item_id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let cart_exists: Option<(String,)> =
            sqlx::query_as(r#"SELECT id FROM carts WHERE id = ?"#)
                .bind(&cart_id_str)
                .fetch_optional(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        if cart_exists.is_none() {
            return Err(RepoError::NotFound);
        }

        let item_exists: Option<(String,)> =
            sqlx::query_as(r#"SELECT id FROM items WHERE id = ?"#)
                .bind(&item_id_str)
                .fetch_optional(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        if item_exists.is_none() {
            return Err(RepoError::Domain(DomainError::ItemNotFound(item_id)));
        }

        // Adding an item already in the cart sums quantities on the line.
        sqlx::query(
            r#"INSERT INTO cart_items (id, cart_id, item_id, quantity) VALUES (?, ?, ?, ?)
               ON CONFLICT (cart_id, item_id) DO UPDATE SET quantity = quantity + excluded.quantity"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&cart_id_str)
        .bind(&item_id_str)
        .bind(quantity as i64)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let line: DbCartLine = sqlx::query_as(
            r#"SELECT ci.id, ci.quantity,
               i.id AS item_id, i.name AS item_name, i.description AS item_description,
               i.price AS item_price, i.currency AS item_currency
               FROM cart_items ci JOIN items i ON i.id = ci.item_id
               WHERE ci.cart_id = ? AND ci.item_id = ?"#,
        )
        .bind(&cart_id_str)
        .bind(&item_id_str)
        .fetch_one(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        line.into_domain()
    }

    async fn delete_cart(&self, id: CartId) -> Result<bool, RepoError> {
        let id_str = id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        sqlx::query(r#"DELETE FROM cart_items WHERE cart_id = ?"#)
            .bind(&id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let result = sqlx::query(r#"DELETE FROM carts WHERE id = ?"#)
            .bind(&id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn build_order(
        &self,
        source: OrderSource,
        currency: CurrencyCode,
        rates: &RateTable,
    ) -> Result<Order, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // Resolve the source lines inside the transaction so a concurrent
        // build of the same cart cannot be observed twice.
        let source_lines: Vec<(Item, u32)> = match source {
            OrderSource::Cart(cart_id) => {
                let cart_id_str = cart_id.to_string();
                let cart_row: Option<(String,)> =
                    sqlx::query_as(r#"SELECT id FROM carts WHERE id = ?"#)
                        .bind(&cart_id_str)
                        .fetch_optional(&mut *db_tx)
                        .await
                        .map_err(|e| RepoError::Database(e.to_string()))?;
                if cart_row.is_none() {
                    return Err(RepoError::Domain(DomainError::CartNotFound(cart_id)));
                }

                let lines: Vec<DbCartLine> = sqlx::query_as(CART_LINES_SQL)
                    .bind(&cart_id_str)
                    .fetch_all(&mut *db_tx)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;
                if lines.is_empty() {
                    return Err(RepoError::Domain(DomainError::EmptyCart));
                }

                lines
                    .into_iter()
                    .map(|line| line.into_domain().map(|l| (l.item, l.quantity)))
                    .collect::<Result<Vec<_>, _>>()?
            }
            OrderSource::SingleItem(item_id) => {
                let row: Option<DbItem> = sqlx::query_as(
                    r#"SELECT id, name, description, price, currency FROM items WHERE id = ?"#,
                )
                .bind(item_id.to_string())
                .fetch_optional(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

                let item = row
                    .ok_or(RepoError::Domain(DomainError::ItemNotFound(item_id)))?
                    .into_domain()?;
                vec![(item, 1)]
            }
        };

        // Order shell, then the lines with snapshotted converted prices.
        let order_id = OrderId::new();
        let created_at = chrono::Utc::now();

        sqlx::query(
            r#"INSERT INTO orders (id, created_at, payment_status, stripe_payment_intent_id,
               order_currency, subtotal, discount_amount, tax_amount, total)
               VALUES (?, ?, 'P', NULL, ?, 0, 0, 0, 0)"#,
        )
        .bind(order_id.to_string())
        .bind(created_at.to_rfc3339())
        .bind(currency.code())
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let mut order_lines = Vec::with_capacity(source_lines.len());
        for (item, quantity) in source_lines {
            let unit_price = rates
                .convert(item.price, item.currency, currency)
                .map_err(|e| RepoError::Domain(DomainError::Exchange(e)))?;

            let line_id = Uuid::new_v4();
            sqlx::query(
                r#"INSERT INTO order_items (id, order_id, item_id, quantity, unit_price)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(line_id.to_string())
            .bind(order_id.to_string())
            .bind(item.id.to_string())
            .bind(quantity as i64)
            .bind(unit_price)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            order_lines.push(OrderLineItem {
                id: line_id,
                item,
                quantity,
                unit_price,
            });
        }

        // Price under the rules active right now, inside the same transaction.
        let discount = active_rule_tx(&mut db_tx, RuleKind::Discount).await?;
        let tax = active_rule_tx(&mut db_tx, RuleKind::Tax).await?;

        let breakdown = price_lines(
            order_lines.iter().map(|l| (l.quantity, l.unit_price)),
            discount.as_ref().map(|r| r.percentage),
            tax.as_ref().map(|r| r.percentage),
        );

        sqlx::query(
            r#"UPDATE orders SET subtotal = ?, discount_amount = ?, tax_amount = ?, total = ?
               WHERE id = ?"#,
        )
        .bind(breakdown.subtotal)
        .bind(breakdown.discount_amount)
        .bind(breakdown.tax_amount)
        .bind(breakdown.total)
        .bind(order_id.to_string())
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        // A cart source is consumed by the build. If a concurrent build beat
        // us to the delete the whole transaction rolls back.
        if let OrderSource::Cart(cart_id) = source {
            let cart_id_str = cart_id.to_string();
            sqlx::query(r#"DELETE FROM cart_items WHERE cart_id = ?"#)
                .bind(&cart_id_str)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

            let deleted = sqlx::query(r#"DELETE FROM carts WHERE id = ?"#)
                .bind(&cart_id_str)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
            if deleted.rows_affected() == 0 {
                return Err(RepoError::Domain(DomainError::CartNotFound(cart_id)));
            }
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        tracing::debug!(%order_id, lines = order_lines.len(), total = breakdown.total, "order built");

        Ok(Order::from_parts(
            order_id,
            created_at,
            PaymentStatus::Pending,
            None,
            order_lines,
            breakdown.subtotal,
            breakdown.discount_amount,
            breakdown.tax_amount,
            breakdown.total,
            currency,
        ))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        let id_str = id.to_string();

        let row: Option<DbOrder> = sqlx::query_as(
            r#"SELECT id, created_at, payment_status, stripe_payment_intent_id, order_currency,
               subtotal, discount_amount, tax_amount, total
               FROM orders WHERE id = ?"#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let Some(order_row) = row else {
            return Ok(None);
        };

        let lines: Vec<DbOrderLine> = sqlx::query_as(ORDER_LINES_SQL)
            .bind(&id_str)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let items = lines
            .into_iter()
            .map(DbOrderLine::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        order_row.into_domain(items).map(Some)
    }

    async fn set_payment_intent(
        &self,
        id: OrderId,
        intent_id: &str,
        expected_from: &[PaymentStatus],
    ) -> Result<(), RepoError> {
        let id_str = id.to_string();
        self.ensure_order_exists(&id_str).await?;

        let sql = format!(
            "UPDATE orders SET stripe_payment_intent_id = ? WHERE id = ? AND payment_status IN ({})",
            placeholders(expected_from.len())
        );
        let mut query = sqlx::query(&sql).bind(intent_id).bind(&id_str);
        for status in expected_from {
            query = query.bind(status.code());
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::Conflict(
                "Payment state changed concurrently".into(),
            ));
        }
        Ok(())
    }

    async fn transition_payment_status(
        &self,
        id: OrderId,
        expected_from: &[PaymentStatus],
        to: PaymentStatus,
    ) -> Result<(), RepoError> {
        let id_str = id.to_string();
        self.ensure_order_exists(&id_str).await?;

        let sql = format!(
            "UPDATE orders SET payment_status = ? WHERE id = ? AND payment_status IN ({})",
            placeholders(expected_from.len())
        );
        let mut query = sqlx::query(&sql).bind(to.code()).bind(&id_str);
        for status in expected_from {
            query = query.bind(status.code());
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::Conflict(
                "Payment state changed concurrently".into(),
            ));
        }
        Ok(())
    }

    async fn create_rule(&self, rule: PricingRule) -> Result<PricingRule, RepoError> {
        sqlx::query(
            r#"INSERT INTO pricing_rules (id, kind, name, percentage_bp, is_active)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(rule.id.to_string())
        .bind(rule.kind.as_str())
        .bind(&rule.name)
        .bind(rule.percentage.basis_points())
        .bind(rule.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(rule)
    }

    async fn list_rules(&self, kind: RuleKind) -> Result<Vec<PricingRule>, RepoError> {
        let rows: Vec<DbRule> = sqlx::query_as(
            r#"SELECT id, kind, name, percentage_bp, is_active FROM pricing_rules
               WHERE kind = ? ORDER BY name"#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRule::into_domain).collect()
    }

    async fn active_rule(&self, kind: RuleKind) -> Result<Option<PricingRule>, RepoError> {
        let row: Option<DbRule> = sqlx::query_as(
            r#"SELECT id, kind, name, percentage_bp, is_active FROM pricing_rules
               WHERE kind = ? AND is_active = 1 LIMIT 1"#,
        )
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbRule::into_domain).transpose()
    }

    async fn activate_rule(&self, id: RuleId) -> Result<PricingRule, RepoError> {
        let id_str = id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbRule> = sqlx::query_as(
            r#"SELECT id, kind, name, percentage_bp, is_active FROM pricing_rules WHERE id = ?"#,
        )
        .bind(&id_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let rule = row.ok_or(RepoError::NotFound)?.into_domain()?;

        // Deactivate-all-then-activate-one, atomically.
        sqlx::query(r#"UPDATE pricing_rules SET is_active = 0 WHERE kind = ?"#)
            .bind(rule.kind.as_str())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        sqlx::query(r#"UPDATE pricing_rules SET is_active = 1 WHERE id = ?"#)
            .bind(&id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(PricingRule::from_parts(
            rule.id,
            rule.kind,
            rule.name,
            rule.percentage,
            true,
        ))
    }
}

impl SqliteRepo {
    async fn ensure_order_exists(&self, id_str: &str) -> Result<(), RepoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT id FROM orders WHERE id = ?"#)
                .bind(id_str)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        match row {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

async fn active_rule_tx(
    db_tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    kind: RuleKind,
) -> Result<Option<PricingRule>, RepoError> {
    let row: Option<DbRule> = sqlx::query_as(
        r#"SELECT id, kind, name, percentage_bp, is_active FROM pricing_rules
           WHERE kind = ? AND is_active = 1 LIMIT 1"#,
    )
    .bind(kind.as_str())
    .fetch_optional(&mut **db_tx)
    .await
    .map_err(|e| RepoError::Database(e.to_string()))?;

    row.map(DbRule::into_domain).transpose()
}

fn placeholders(n: usize) -> String {
    vec!["?"; n.max(1)].join(", ")
}
