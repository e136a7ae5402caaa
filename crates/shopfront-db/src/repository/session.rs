//! # Session Repository
//!
//! Shopping sessions and the activity log.
//!
//! A session scopes a customer's visit: the cart and any order placed
//! during it hang off the (customer_id, session_number) pair. Session
//! numbers count up per customer; `ended_at` is stamped at logout.
//!
//! The activity log (searches, product views) is append-only and is
//! recorded by the terminal beside the corresponding catalog read; the
//! reads themselves stay pure.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use shopfront_core::{Session, SessionKey};

/// Repository for session and activity-log operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Opens a new session for a customer.
    ///
    /// The session number is max + 1 for this customer (1 on first visit);
    /// `ended_at` stays NULL until [`close`](Self::close).
    pub async fn open(&self, customer_id: i64) -> StoreResult<Session> {
        let mut tx = self.pool.begin().await?;

        let max_number: Option<i64> =
            sqlx::query_scalar("SELECT MAX(session_number) FROM sessions WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_one(&mut *tx)
                .await?;
        let session_number = max_number.unwrap_or(0) + 1;
        let started_at = Utc::now();

        debug!(customer_id, session_number, "Opening session");

        sqlx::query(
            r#"
            INSERT INTO sessions (customer_id, session_number, started_at, ended_at)
            VALUES (?1, ?2, ?3, NULL)
            "#,
        )
        .bind(customer_id)
        .bind(session_number)
        .bind(started_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Session {
            customer_id,
            session_number,
            started_at,
            ended_at: None,
        })
    }

    /// Closes a session, stamping its end time (called at logout).
    pub async fn close(&self, key: &SessionKey) -> StoreResult<()> {
        debug!(
            customer_id = key.customer_id,
            session_number = key.session_number,
            "Closing session"
        );

        let result = sqlx::query(
            r#"
            UPDATE sessions SET ended_at = ?3
            WHERE customer_id = ?1 AND session_number = ?2
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "Session",
                format!("{}/{}", key.customer_id, key.session_number),
            ));
        }

        Ok(())
    }

    /// Gets a session by key.
    pub async fn get(&self, key: &SessionKey) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT customer_id, session_number, started_at, ended_at
            FROM sessions
            WHERE customer_id = ?1 AND session_number = ?2
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Records a catalog search in the activity log.
    pub async fn record_search(&self, key: &SessionKey, query: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO searches (customer_id, session_number, searched_at, query)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(Utc::now())
        .bind(query)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records a product-detail view in the activity log.
    pub async fn record_product_view(&self, key: &SessionKey, product_id: i64) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_views (customer_id, session_number, viewed_at, product_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(key.customer_id)
        .bind(key.session_number)
        .bind(Utc::now())
        .bind(product_id)
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

    async fn test_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    async fn register_customer(db: &Database) -> i64 {
        db.customers()
            .register("Ada", "ada@example.com", "pw")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_session_numbers_count_up_per_customer() {
        let db = test_db().await;
        let customer_id = register_customer(&db).await;
        let repo = db.sessions();

        let first = repo.open(customer_id).await.unwrap();
        assert_eq!(first.session_number, 1);
        assert!(first.ended_at.is_none());

        let second = repo.open(customer_id).await.unwrap();
        assert_eq!(second.session_number, 2);

        // A different customer starts back at 1
        let other = db
            .customers()
            .register("Grace", "grace@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(repo.open(other.id).await.unwrap().session_number, 1);
    }

    #[tokio::test]
    async fn test_close_stamps_end_time() {
        let db = test_db().await;
        let customer_id = register_customer(&db).await;
        let repo = db.sessions();

        let session = repo.open(customer_id).await.unwrap();
        repo.close(&session.key()).await.unwrap();

        let closed = repo.get(&session.key()).await.unwrap().unwrap();
        assert!(closed.ended_at.is_some());

        // Closing a session that never existed is an error
        let err = repo.close(&SessionKey::new(99, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_activity_log_appends() {
        let db = test_db().await;
        let customer_id = register_customer(&db).await;
        let session = db.sessions().open(customer_id).await.unwrap();
        let key = session.key();

        db.products()
            .insert(&shopfront_core::Product {
                id: 1,
                name: "Widget".to_string(),
                category: "Hardware".to_string(),
                price_cents: 100,
                stock: 1,
                description: String::new(),
            })
            .await
            .unwrap();

        db.sessions().record_search(&key, "widget").await.unwrap();
        db.sessions().record_search(&key, "gadget").await.unwrap();
        db.sessions().record_product_view(&key, 1).await.unwrap();

        let searches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM searches")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let views: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_views")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(searches, 2);
        assert_eq!(views, 1);
    }
}
