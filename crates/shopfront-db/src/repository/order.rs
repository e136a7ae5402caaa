//! # Order Repository
//!
//! The order engine: converts a session's cart into a durable order.
//!
//! ## Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      place_order(key, address)                          │
//! │                                                                         │
//! │  BEGIN ──► read cart (listing order)                                   │
//! │              │                                                          │
//! │              ├── empty ──► EmptyCart, rollback (nothing was written)   │
//! │              │                                                          │
//! │              ▼                                                          │
//! │            order_number = MAX + 1 ──► insert order header              │
//! │              │                                                          │
//! │              ▼                                                          │
//! │            for each line (line_number = 1, 2, …):                      │
//! │              re-read stock + price                                     │
//! │              ├── stock < qty ──► InsufficientStock, ROLLBACK ALL       │
//! │              ├── insert order line (price captured)                    │
//! │              └── decrement stock                                       │
//! │              │                                                          │
//! │              ▼                                                          │
//! │            clear cart ──► COMMIT ──► order_number                      │
//! │                                                                         │
//! │  All-or-nothing: exactly one order + its full set of lines + matching  │
//! │  stock decrements + the cart clear persist together, or none of them.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every read and write in the flow runs on the one transaction
//! connection, so the read-check-write sequence per line is atomic with
//! respect to any other writer of the same product rows: SQLite holds the
//! write lock until commit, and a multi-writer deployment gets the same
//! serialized behavior without code changes.
//!
//! The order number is assigned *inside* the transaction, so a rolled-back
//! checkout can never burn or duplicate a number.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use shopfront_core::{CartLine, DomainError, OrderLineDetail, OrderSummary, SessionKey};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order from the session's cart.
    ///
    /// ## Arguments
    /// * `key` - The session whose cart is being checked out
    /// * `shipping_address` - Stored verbatim on the order header
    ///
    /// ## Returns
    /// The new order number.
    ///
    /// ## Errors
    /// * `EmptyCart` - The cart has no lines; nothing was written
    /// * `InsufficientStock` - Some line's quantity exceeds the stock on
    ///   hand at commit time; the whole transaction rolls back (no order,
    ///   no lines, no stock change, cart untouched)
    /// * Any persistence failure also rolls back the whole transaction;
    ///   the caller may re-invoke
    pub async fn place_order(&self, key: &SessionKey, shipping_address: &str) -> StoreResult<i64> {
        // Every early `?`/`return` below drops the transaction, which
        // rolls it back; only the final commit makes anything visible.
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT ct.product_id,
                   p.name,
                   p.price_cents AS unit_price_cents,
                   ct.quantity,
                   p.stock AS available_stock
            FROM cart_lines ct
            JOIN products p ON p.id = ct.product_id
            WHERE ct.customer_id = ?1 AND ct.session_number = ?2
            ORDER BY ct.rowid
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(StoreError::Domain(DomainError::EmptyCart));
        }

        let max_number: Option<i64> = sqlx::query_scalar("SELECT MAX(order_number) FROM orders")
            .fetch_one(&mut *tx)
            .await?;
        let order_number = max_number.unwrap_or(0) + 1;
        let placed_at = Utc::now();

        debug!(
            order_number,
            customer_id = key.customer_id,
            session_number = key.session_number,
            line_count = lines.len(),
            "Placing order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (order_number, customer_id, session_number, placed_at, shipping_address)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_number)
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(placed_at)
        .bind(shipping_address)
        .execute(&mut *tx)
        .await?;

        for (index, line) in lines.iter().enumerate() {
            let line_number = index as i64 + 1;

            // Authoritative re-read on the transaction connection: the
            // joined cart read above could already be stale relative to
            // a price edit between the two statements in a multi-writer
            // deployment, and this is where the stock invariant matters.
            let (available, price_cents): (i64, i64) =
                sqlx::query_as("SELECT stock, price_cents FROM products WHERE id = ?1")
                    .bind(line.product_id)
                    .fetch_one(&mut *tx)
                    .await?;

            if available < line.quantity {
                return Err(StoreError::Domain(DomainError::InsufficientStock {
                    product_id: line.product_id,
                    available,
                    requested: line.quantity,
                }));
            }

            sqlx::query(
                r#"
                INSERT INTO order_lines (order_number, line_number, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(order_number)
            .bind(line_number)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(price_cents)
            .execute(&mut *tx)
            .await?;

            Self::decrement_stock(&mut tx, line.product_id, line.quantity).await?;
        }

        sqlx::query("DELETE FROM cart_lines WHERE customer_id = ?1 AND session_number = ?2")
            .bind(key.customer_id)
            .bind(key.session_number)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        info!(order_number, "Order placed");
        Ok(order_number)
    }

    /// Decrements a product's stock within the checkout transaction.
    ///
    /// The caller has already verified availability on the same
    /// connection; a non-positive amount or a missed update here means a
    /// precondition check upstream is broken, and that is a bug, not a
    /// recoverable error.
    async fn decrement_stock(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: i64,
        amount: i64,
    ) -> StoreResult<()> {
        assert!(
            amount > 0,
            "stock decrement must be positive (got {amount} for product {product_id})"
        );

        let result =
            sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
                .bind(amount)
                .bind(product_id)
                .execute(&mut **tx)
                .await?;

        assert_eq!(
            result.rows_affected(),
            1,
            "stock decrement missed for product {product_id}: availability was not pre-checked"
        );

        Ok(())
    }

    /// Gets an order's lines joined with their products, in line order.
    ///
    /// Read-only; prices are the ones captured at checkout.
    pub async fn get_order_details(&self, order_number: i64) -> StoreResult<Vec<OrderLineDetail>> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT order_number FROM orders WHERE order_number = ?1")
                .bind(order_number)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(StoreError::Domain(DomainError::OrderNotFound(order_number)));
        }

        let details = sqlx::query_as::<_, OrderLineDetail>(
            r#"
            SELECT p.name AS product_name,
                   p.category,
                   ol.quantity,
                   ol.unit_price_cents,
                   ol.quantity * ol.unit_price_cents AS line_total_cents
            FROM order_lines ol
            JOIN products p ON p.id = ol.product_id
            WHERE ol.order_number = ?1
            ORDER BY ol.line_number
            "#,
        )
        .bind(order_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Lists a customer's orders, newest first, each with a total summed
    /// from its lines at their captured prices.
    pub async fn get_orders_for_customer(&self, customer_id: i64) -> StoreResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.order_number,
                   o.placed_at,
                   o.shipping_address,
                   SUM(ol.quantity * ol.unit_price_cents) AS total_cents
            FROM orders o
            JOIN order_lines ol ON ol.order_number = o.order_number
            WHERE o.customer_id = ?1
            GROUP BY o.order_number, o.placed_at, o.shipping_address
            ORDER BY o.placed_at DESC, o.order_number DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
