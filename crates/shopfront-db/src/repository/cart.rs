//! # Cart Repository
//!
//! Per-session cart lines.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Line Lifecycle                               │
//! │                                                                         │
//! │  upsert_line(key, pid, qty, Add)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  new_qty = existing + qty        (Set: new_qty = qty)                  │
//! │       │                                                                 │
//! │       ├── new_qty == 0 ──► delete the line (no-op if absent)           │
//! │       │                                                                 │
//! │       ├── new_qty > stock ──► CartStockExceeded, nothing written       │
//! │       │                                                                 │
//! │       └── else ──► upsert the line                                     │
//! │                                                                         │
//! │  Invariant: a line exists ⟺ its quantity is positive. Zero-quantity    │
//! │  lines are never stored; one line per (session, product).              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check here is advisory: it keeps obviously-bad carts out,
//! but checkout re-validates authoritatively inside its transaction. The
//! stock is re-read in the same call that decides the new quantity, so
//! the advisory check is never stale relative to the decision.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use shopfront_core::{CartLine, CartMode, DomainError, SessionKey};

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds to or sets a cart line's quantity.
    ///
    /// ## Arguments
    /// * `key` - The session the cart belongs to
    /// * `product_id` - Product being added/set
    /// * `quantity` - Non-negative; with `Set`, 0 removes the line
    /// * `mode` - [`CartMode::Add`] merges with an existing line,
    ///   [`CartMode::Set`] replaces it
    ///
    /// ## Returns
    /// The line's new quantity (0 when the line was removed).
    ///
    /// ## Errors
    /// * `ProductNotFound` - No such product
    /// * `CartStockExceeded` - New quantity exceeds current stock;
    ///   nothing is written
    pub async fn upsert_line(
        &self,
        key: &SessionKey,
        product_id: i64,
        quantity: i64,
        mode: CartMode,
    ) -> StoreResult<i64> {
        // Negative quantities never reach the store: the terminal
        // validates first, so one slipping through is a bug upstream.
        assert!(
            quantity >= 0,
            "cart quantity must be non-negative (got {quantity})"
        );

        // Stock read and quantity decision happen in the same step
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        let stock = stock.ok_or(StoreError::Domain(DomainError::ProductNotFound(product_id)))?;

        let existing: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT quantity FROM cart_lines
            WHERE customer_id = ?1 AND session_number = ?2 AND product_id = ?3
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        let new_quantity = match mode {
            CartMode::Add => existing.unwrap_or(0) + quantity,
            CartMode::Set => quantity,
        };

        if new_quantity == 0 {
            self.remove_line(key, product_id).await?;
            return Ok(0);
        }

        if new_quantity > stock {
            return Err(StoreError::Domain(DomainError::CartStockExceeded {
                product_id,
                available: stock,
                requested: new_quantity,
            }));
        }

        debug!(
            customer_id = key.customer_id,
            session_number = key.session_number,
            product_id,
            new_quantity,
            "Upserting cart line"
        );

        // SQLite keeps the rowid across DO UPDATE, so a quantity change
        // leaves the line's listing position alone
        sqlx::query(
            r#"
            INSERT INTO cart_lines (customer_id, session_number, product_id, quantity)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (customer_id, session_number, product_id)
            DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(product_id)
        .bind(new_quantity)
        .execute(&self.pool)
        .await?;

        Ok(new_quantity)
    }

    /// Lists the cart's lines joined with their products, in insertion
    /// order. Empty carts return an empty sequence.
    ///
    /// Checkout iterates this same ordering, so order line numbers
    /// reproduce the listing exactly.
    pub async fn list_lines(&self, key: &SessionKey) -> StoreResult<Vec<CartLine>> {
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
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Deletes one cart line. Succeeds even if the line is absent.
    pub async fn remove_line(&self, key: &SessionKey, product_id: i64) -> StoreResult<()> {
        sqlx::query(
            r#"
            DELETE FROM cart_lines
            WHERE customer_id = ?1 AND session_number = ?2 AND product_id = ?3
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes all of the session's cart lines.
    ///
    /// Called explicitly by the user, or by the order engine after a
    /// successful checkout (on the checkout transaction's connection,
    /// not through this method).
    pub async fn clear(&self, key: &SessionKey) -> StoreResult<()> {
        debug!(
            customer_id = key.customer_id,
            session_number = key.session_number,
            "Clearing cart"
        );

        sqlx::query("DELETE FROM cart_lines WHERE customer_id = ?1 AND session_number = ?2")
            .bind(key.customer_id)
            .bind(key.session_number)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shopfront_core::Product;

    async fn test_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    /// Registers a customer, opens a session and seeds one product.
    async fn fixture(db: &Database, product_id: i64, stock: i64) -> SessionKey {
        let user = db
            .customers()
            .register("Ada", "ada@example.com", "pw")
            .await
            .unwrap();
        let session = db.sessions().open(user.id).await.unwrap();

        db.products()
            .insert(&Product {
                id: product_id,
                name: format!("Product {product_id}"),
                category: "Test".to_string(),
                price_cents: 250,
                stock,
                description: String::new(),
            })
            .await
            .unwrap();

        session.key()
    }

    #[tokio::test]
    async fn test_add_merges_quantities() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;
        let carts = db.carts();

        assert_eq!(
            carts.upsert_line(&key, 9, 3, CartMode::Add).await.unwrap(),
            3
        );
        assert_eq!(
            carts.upsert_line(&key, 9, 2, CartMode::Add).await.unwrap(),
            5
        );

        let lines = carts.list_lines(&key).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].line_total().cents(), 1250);
    }

    #[tokio::test]
    async fn test_set_replaces_quantity() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;
        let carts = db.carts();

        carts.upsert_line(&key, 9, 3, CartMode::Add).await.unwrap();
        assert_eq!(
            carts.upsert_line(&key, 9, 7, CartMode::Set).await.unwrap(),
            7
        );

        let lines = carts.list_lines(&key).await.unwrap();
        assert_eq!(lines[0].quantity, 7);
    }

    #[tokio::test]
    async fn test_zero_quantity_collapses_the_line() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;
        let carts = db.carts();

        carts.upsert_line(&key, 9, 3, CartMode::Add).await.unwrap();
        assert_eq!(
            carts.upsert_line(&key, 9, 0, CartMode::Set).await.unwrap(),
            0
        );
        assert!(carts.list_lines(&key).await.unwrap().is_empty());

        // Setting an absent line to zero is a no-op, not an error
        assert_eq!(
            carts.upsert_line(&key, 9, 0, CartMode::Set).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_stock_exceeded_leaves_cart_untouched() {
        let db = test_db().await;
        let key = fixture(&db, 9, 4).await;
        let carts = db.carts();

        carts.upsert_line(&key, 9, 3, CartMode::Add).await.unwrap();

        let err = carts
            .upsert_line(&key, 9, 2, CartMode::Add)
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::CartStockExceeded {
                product_id: 9,
                available: 4,
                requested: 5,
            })
        ));

        // The existing line is unchanged
        let lines = carts.list_lines(&key).await.unwrap();
        assert_eq!(lines[0].quantity, 3);

        // A fresh add to an out-of-stock product is rejected the same way
        db.products().set_stock(9, 0).await.unwrap();
        carts.remove_line(&key, 9).await.unwrap();
        let err = carts
            .upsert_line(&key, 9, 1, CartMode::Add)
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::CartStockExceeded { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;

        let err = db
            .carts()
            .upsert_line(&key, 42, 1, CartMode::Add)
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::ProductNotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_clear_empties() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;
        let carts = db.carts();

        // Removing an absent line succeeds
        carts.remove_line(&key, 9).await.unwrap();

        db.products()
            .insert(&Product {
                id: 10,
                name: "Other".to_string(),
                category: "Test".to_string(),
                price_cents: 100,
                stock: 5,
                description: String::new(),
            })
            .await
            .unwrap();

        carts.upsert_line(&key, 9, 2, CartMode::Add).await.unwrap();
        carts.upsert_line(&key, 10, 1, CartMode::Add).await.unwrap();
        assert_eq!(carts.list_lines(&key).await.unwrap().len(), 2);

        carts.clear(&key).await.unwrap();
        assert!(carts.list_lines(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_preserves_insertion_order() {
        let db = test_db().await;
        let key = fixture(&db, 9, 10).await;
        let carts = db.carts();

        for id in [10, 11] {
            db.products()
                .insert(&Product {
                    id,
                    name: format!("Product {id}"),
                    category: "Test".to_string(),
                    price_cents: 100,
                    stock: 5,
                    description: String::new(),
                })
                .await
                .unwrap();
        }

        carts.upsert_line(&key, 11, 1, CartMode::Add).await.unwrap();
        carts.upsert_line(&key, 9, 1, CartMode::Add).await.unwrap();
        carts.upsert_line(&key, 10, 1, CartMode::Add).await.unwrap();

        // A quantity change keeps the line's position
        carts.upsert_line(&key, 11, 2, CartMode::Set).await.unwrap();

        let order: Vec<i64> = carts
            .list_lines(&key)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.product_id)
            .collect();
        assert_eq!(order, vec![11, 9, 10]);
    }
}
