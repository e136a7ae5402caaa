//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Keyword search (every keyword must match name, category or description)
//! - Detail and listing reads
//! - Stock reads and administrative price/stock edits
//!
//! The administrative edits live outside the checkout transaction: the
//! order engine re-validates stock on its own connection, so a stale edit
//! can never drive stock negative.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use shopfront_core::{DomainError, Money, Product};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("oat milk", 20).await?;
/// let product = repo.get_by_id(9).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches products by keywords.
    ///
    /// ## How It Works
    /// The query is split on whitespace; every keyword must match the
    /// name, category or description, case-insensitively (`LIKE '%kw%'`).
    /// An empty query falls back to the plain listing.
    ///
    /// ## Arguments
    /// * `query` - Whitespace-separated keywords (can be partial words)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> StoreResult<Vec<Product>> {
        let terms: Vec<&str> = query.split_whitespace().collect();

        debug!(query = %query, limit = limit, "Searching products");

        if terms.is_empty() {
            return self.list(limit).await;
        }

        let mut sql = String::from(
            "SELECT id, name, category, price_cents, stock, description \
             FROM products WHERE 1 = 1",
        );
        for _ in &terms {
            sql.push_str(" AND (name LIKE ? OR category LIKE ? OR description LIKE ?)");
        }
        sql.push_str(" ORDER BY name, id LIMIT ?");

        let mut q = sqlx::query_as::<_, Product>(&sql);
        for term in &terms {
            let pattern = format!("%{}%", term);
            q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }
        let products = q.bind(limit).fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products sorted by name (no search filter).
    pub async fn list(&self, limit: u32) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_cents, stock, description
            FROM products
            ORDER BY name, id
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_cents, stock, description
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Reads the current stock count for a product.
    ///
    /// This is the advisory read used by cart mutations; checkout performs
    /// its own authoritative read inside its transaction.
    pub async fn read_stock(&self, id: i64) -> StoreResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        stock.ok_or(StoreError::Domain(DomainError::ProductNotFound(id)))
    }

    /// Sets a product's price (administrative edit).
    ///
    /// The caller validates non-negativity before the call; order lines
    /// placed earlier keep their captured prices.
    pub async fn set_price(&self, id: i64, price: Money) -> StoreResult<()> {
        debug!(product_id = id, price = %price, "Updating product price");

        let result = sqlx::query("UPDATE products SET price_cents = ?2 WHERE id = ?1")
            .bind(id)
            .bind(price.cents())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::ProductNotFound(id)));
        }

        Ok(())
    }

    /// Sets a product's stock to an absolute count (administrative edit).
    ///
    /// Checkout is the only path that decrements stock; this replaces the
    /// count outright, e.g. after receiving a delivery.
    pub async fn set_stock(&self, id: i64, stock: i64) -> StoreResult<()> {
        debug!(product_id = id, stock = stock, "Updating product stock");

        let result = sqlx::query("UPDATE products SET stock = ?2 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::ProductNotFound(id)));
        }

        Ok(())
    }

    /// Inserts a product (used by the seed tool and tests).
    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price_cents, stock, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts all products in the catalog.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    fn product(id: i64, name: &str, category: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price_cents,
            stock,
            description: format!("{name} ({category})"),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product(1, "Oat Milk", "Dairy", 499, 12))
            .await
            .unwrap();

        let found = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.name, "Oat Milk");
        assert_eq!(found.price_cents, 499);
        assert_eq!(found.stock, 12);

        assert!(repo.get_by_id(99).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_requires_every_keyword() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product(1, "Oat Milk", "Dairy", 499, 12))
            .await
            .unwrap();
        repo.insert(&product(2, "Whole Milk", "Dairy", 389, 30))
            .await
            .unwrap();
        repo.insert(&product(3, "Oat Cookies", "Snacks", 299, 8))
            .await
            .unwrap();

        let hits = repo.search("oat milk", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // Single keyword matches across name and category
        let hits = repo.search("dairy", 20).await.unwrap();
        assert_eq!(hits.len(), 2);

        // Case-insensitive
        let hits = repo.search("OAT", 20).await.unwrap();
        assert_eq!(hits.len(), 2);

        // Empty query falls back to the listing
        let hits = repo.search("   ", 20).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_read_stock_and_missing_product() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product(5, "Widget", "Hardware", 1099, 3))
            .await
            .unwrap();

        assert_eq!(repo.read_stock(5).await.unwrap(), 3);

        let err = repo.read_stock(42).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::ProductNotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_set_price_and_stock() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product(5, "Widget", "Hardware", 1099, 3))
            .await
            .unwrap();

        repo.set_price(5, Money::from_cents(1299)).await.unwrap();
        repo.set_stock(5, 10).await.unwrap();

        let updated = repo.get_by_id(5).await.unwrap().unwrap();
        assert_eq!(updated.price_cents, 1299);
        assert_eq!(updated.stock, 10);

        let err = repo.set_price(42, Money::from_cents(100)).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::ProductNotFound(42))
        ));
    }
}
