//! # Report Repository
//!
//! Aggregate sales metrics for the sales-staff surface.
//!
//! All reads; nothing here touches the checkout path. Time windows are
//! passed in as bound parameters rather than computed in SQL, so the
//! queries are deterministic under test.

use chrono::{DateTime, Days, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::error::StoreResult;
use shopfront_core::{ProductRank, WeeklyMetrics};

/// Start of the trailing 7-day window (inclusive): midnight UTC six days
/// before `now`'s date.
pub fn trailing_week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first_day = now.date_naive() - Days::new(6);
    first_day.and_time(NaiveTime::MIN).and_utc()
}

/// Repository for sales-metric queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Computes sales metrics for orders placed at or after `since`.
    ///
    /// ## Returns
    /// Distinct orders, distinct products sold, distinct customers, total
    /// sales at captured prices, and average spend per customer (zero
    /// when nobody ordered).
    pub async fn weekly_metrics(&self, since: DateTime<Utc>) -> StoreResult<WeeklyMetrics> {
        let orders: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT o.order_number) FROM orders o WHERE o.placed_at >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let products: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT ol.product_id)
            FROM order_lines ol
            JOIN orders o ON o.order_number = ol.order_number
            WHERE o.placed_at >= ?1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let customers: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT o.customer_id) FROM orders o WHERE o.placed_at >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let total_sales_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(ol.quantity * ol.unit_price_cents), 0)
            FROM order_lines ol
            JOIN orders o ON o.order_number = ol.order_number
            WHERE o.placed_at >= ?1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let avg_per_customer_cents = if customers > 0 {
            total_sales_cents / customers
        } else {
            0
        };

        Ok(WeeklyMetrics {
            orders,
            products,
            customers,
            total_sales_cents,
            avg_per_customer_cents,
        })
    }

    /// Top products by the number of distinct orders they appear in:
    /// the top three ranks, including ties at the third distinct count.
    pub async fn top_products_by_orders(&self) -> StoreResult<Vec<ProductRank>> {
        let rows = sqlx::query_as::<_, ProductRank>(
            r#"
            SELECT p.id AS product_id,
                   p.name,
                   COUNT(DISTINCT ol.order_number) AS "count"
            FROM order_lines ol
            JOIN products p ON p.id = ol.product_id
            GROUP BY p.id, p.name
            ORDER BY "count" DESC, p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(top3_with_ties(rows))
    }

    /// Top products by recorded detail views, with the same tie rule.
    pub async fn top_products_by_views(&self) -> StoreResult<Vec<ProductRank>> {
        let rows = sqlx::query_as::<_, ProductRank>(
            r#"
            SELECT p.id AS product_id,
                   p.name,
                   COUNT(*) AS "count"
            FROM product_views v
            JOIN products p ON p.id = v.product_id
            GROUP BY p.id, p.name
            ORDER BY "count" DESC, p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(top3_with_ties(rows))
    }
}

/// Keeps every row whose count reaches the third-highest distinct count
/// (all rows when there are fewer than three distinct counts).
///
/// `rows` must already be sorted by count descending.
fn top3_with_ties(rows: Vec<ProductRank>) -> Vec<ProductRank> {
    let mut distinct: Vec<i64> = rows.iter().map(|r| r.count).collect();
    distinct.dedup();

    let cutoff = match distinct.get(2).or_else(|| distinct.last()) {
        Some(&cutoff) => cutoff,
        None => return rows, // empty input
    };

    rows.into_iter().filter(|r| r.count >= cutoff).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use shopfront_core::{CartMode, Product, SessionKey};

    fn rank(product_id: i64, count: i64) -> ProductRank {
        ProductRank {
            product_id,
            name: format!("Product {product_id}"),
            count,
        }
    }

    #[test]
    fn test_top3_with_ties_cutoff_is_third_distinct_count() {
        // counts: 9, 7, 7, 5, 5, 3 → third distinct count is 5
        let rows = vec![
            rank(1, 9),
            rank(2, 7),
            rank(3, 7),
            rank(4, 5),
            rank(5, 5),
            rank(6, 3),
        ];
        let top = top3_with_ties(rows);
        let ids: Vec<i64> = top.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_top3_with_ties_few_distinct_counts_keeps_everything() {
        let rows = vec![rank(1, 4), rank(2, 4), rank(3, 2)];
        assert_eq!(top3_with_ties(rows).len(), 3);

        assert!(top3_with_ties(Vec::new()).is_empty());
    }

    #[test]
    fn test_trailing_week_start() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap();
        let since = trailing_week_start(now);
        assert_eq!(since, Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap());
    }

    async fn test_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    async fn checkout(db: &Database, key: &SessionKey, product_id: i64, qty: i64) -> i64 {
        db.carts()
            .upsert_line(key, product_id, qty, CartMode::Add)
            .await
            .unwrap();
        db.orders().place_order(key, "addr").await.unwrap()
    }

    #[tokio::test]
    async fn test_weekly_metrics_respect_the_window() {
        let db = test_db().await;

        let user = db
            .customers()
            .register("Ada", "ada@example.com", "pw")
            .await
            .unwrap();
        let key = db.sessions().open(user.id).await.unwrap().key();

        db.products()
            .insert(&Product {
                id: 1,
                name: "Widget".to_string(),
                category: "Hardware".to_string(),
                price_cents: 300,
                stock: 100,
                description: String::new(),
            })
            .await
            .unwrap();

        // One order inside the window…
        checkout(&db, &key, 1, 2).await;

        // …and one well before it, written directly so its timestamp can
        // sit in the past.
        let old = Utc::now() - Days::new(30);
        sqlx::query(
            r#"
            INSERT INTO orders (order_number, customer_id, session_number, placed_at, shipping_address)
            VALUES (99, ?1, ?2, ?3, 'old addr')
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(old)
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO order_lines (order_number, line_number, product_id, quantity, unit_price_cents) \
             VALUES (99, 1, 1, 5, 300)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let metrics = db
            .reports()
            .weekly_metrics(trailing_week_start(Utc::now()))
            .await
            .unwrap();

        assert_eq!(metrics.orders, 1);
        assert_eq!(metrics.products, 1);
        assert_eq!(metrics.customers, 1);
        assert_eq!(metrics.total_sales_cents, 600);
        assert_eq!(metrics.avg_per_customer_cents, 600);
    }

    #[tokio::test]
    async fn test_weekly_metrics_empty_store() {
        let db = test_db().await;

        let metrics = db
            .reports()
            .weekly_metrics(trailing_week_start(Utc::now()))
            .await
            .unwrap();

        assert_eq!(metrics.orders, 0);
        assert_eq!(metrics.total_sales_cents, 0);
        assert_eq!(metrics.avg_per_customer_cents, 0);
    }

    #[tokio::test]
    async fn test_top_products_by_orders_and_views() {
        let db = test_db().await;

        let user = db
            .customers()
            .register("Ada", "ada@example.com", "pw")
            .await
            .unwrap();
        let key = db.sessions().open(user.id).await.unwrap().key();

        for id in 1..=2 {
            db.products()
                .insert(&Product {
                    id,
                    name: format!("Product {id}"),
                    category: "Test".to_string(),
                    price_cents: 100,
                    stock: 100,
                    description: String::new(),
                })
                .await
                .unwrap();
        }

        // Product 1 appears in two orders, product 2 in one
        checkout(&db, &key, 1, 1).await;
        db.carts()
            .upsert_line(&key, 1, 1, CartMode::Add)
            .await
            .unwrap();
        db.carts()
            .upsert_line(&key, 2, 1, CartMode::Add)
            .await
            .unwrap();
        db.orders().place_order(&key, "addr").await.unwrap();

        let by_orders = db.reports().top_products_by_orders().await.unwrap();
        assert_eq!(by_orders[0].product_id, 1);
        assert_eq!(by_orders[0].count, 2);
        assert_eq!(by_orders[1].product_id, 2);
        assert_eq!(by_orders[1].count, 1);

        // Views rank independently of orders
        db.sessions().record_product_view(&key, 2).await.unwrap();
        db.sessions().record_product_view(&key, 2).await.unwrap();
        db.sessions().record_product_view(&key, 1).await.unwrap();

        let by_views = db.reports().top_products_by_views().await.unwrap();
        assert_eq!(by_views[0].product_id, 2);
        assert_eq!(by_views[0].count, 2);
    }
}
