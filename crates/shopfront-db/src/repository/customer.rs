//! # Customer Repository
//!
//! Accounts and registration.
//!
//! Login accounts live in `users` (id, password, role); customers carry a
//! companion `customers` row with name and email. Sales staff have only
//! the `users` row and display as "Sales".
//!
//! Passwords are stored and compared as plain text; the terminal does the
//! comparison verbatim.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use shopfront_core::{Role, User};

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Looks up a login account by id.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - Account found; customers join their name,
    ///   sales staff display as "Sales"
    /// * `Ok(None)` - No such account
    pub async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id,
                   COALESCE(c.name, 'Sales') AS name,
                   u.role,
                   u.password
            FROM users u
            LEFT JOIN customers c ON c.customer_id = u.id
            WHERE u.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks whether an email address is already registered.
    ///
    /// The email column collates NOCASE, so the check is case-insensitive.
    pub async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT customer_id FROM customers WHERE email = ?1")
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(existing.is_some())
    }

    /// Registers a new customer.
    ///
    /// Inserts the `users` and `customers` rows in one transaction, with
    /// the id assigned max + 1. A duplicate email surfaces as a
    /// `UniqueViolation` through the shared error mapping.
    ///
    /// ## Returns
    /// The newly created account (the caller shows the assigned id, which
    /// is the login credential).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        let id = max_id.unwrap_or(0) + 1;

        debug!(user_id = id, "Registering customer");

        sqlx::query("INSERT INTO users (id, password, role) VALUES (?1, ?2, 'customer')")
            .bind(id)
            .bind(password)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO customers (customer_id, name, email) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(name.trim())
            .bind(email.trim())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(User {
            id,
            name: name.trim().to_string(),
            role: Role::Customer,
            password: password.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let db = test_db().await;
        let repo = db.customers();

        let user = repo
            .register("Ada", "ada@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.role, Role::Customer);

        let found = repo.find_user(1).await.unwrap().unwrap();
        assert_eq!(found.name, "Ada");
        assert_eq!(found.password, "secret");

        assert!(repo.find_user(99).await.unwrap().is_none());

        // Ids count up
        let second = repo
            .register("Grace", "grace@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let db = test_db().await;
        let repo = db.customers();

        repo.register("Ada", "ada@example.com", "secret")
            .await
            .unwrap();

        assert!(repo.email_exists("ada@example.com").await.unwrap());
        // NOCASE collation
        assert!(repo.email_exists("ADA@EXAMPLE.COM").await.unwrap());
        assert!(!repo.email_exists("other@example.com").await.unwrap());

        let err = repo
            .register("Imposter", "Ada@Example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // The failed registration burned nothing: users table still has
        // exactly one row and the next id is still 2
        let next = repo
            .register("Grace", "grace@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_sales_account_displays_as_sales() {
        let db = test_db().await;

        sqlx::query("INSERT INTO users (id, password, role) VALUES (7, 'pw', 'sales')")
            .execute(db.pool())
            .await
            .unwrap();

        let user = db.customers().find_user(7).await.unwrap().unwrap();
        assert_eq!(user.name, "Sales");
        assert_eq!(user.role, Role::Sales);
    }
}
