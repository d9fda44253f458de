use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::domain::{Cents, Transaction, TransactionId, TransactionStatus, User, UserId};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying users and transactions.
///
/// Plain reads go through the pool. The balance-mutating workflows compose
/// the `*_in` functions inside a single store transaction obtained from
/// [`Repository::begin`], so a failed step rolls back every mutation.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Begin a store transaction. Dropping it without committing rolls back.
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin store transaction")
    }

    // ========================
    // User operations
    // ========================

    /// Persist a new user and return it with its generated id.
    pub async fn save_user(&self, name: &str, email: &str, balance_cents: Cents) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, balance_cents)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(balance_cents)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save user")?;

        Ok(User {
            id: row.get("id"),
            name: name.to_string(),
            email: email.to_string(),
            balance_cents,
        })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, balance_cents
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// List all users, ordered by id.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, balance_cents
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Fetch a user inside an open store transaction.
    pub async fn user_in(conn: &mut SqliteConnection, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, balance_cents
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch user")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Adjust a user's balance by a signed delta inside an open store transaction.
    pub async fn adjust_balance_in(
        conn: &mut SqliteConnection,
        id: UserId,
        delta_cents: Cents,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET balance_cents = balance_cents + ? WHERE id = ?")
            .bind(delta_cents)
            .bind(id)
            .execute(&mut *conn)
            .await
            .context("Failed to adjust balance")?;
        Ok(())
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            balance_cents: row.get("balance_cents"),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Insert a new transaction row inside an open store transaction.
    pub async fn insert_transaction_in(
        conn: &mut SqliteConnection,
        origin_id: UserId,
        destination_id: UserId,
        amount_cents: Cents,
        status: TransactionStatus,
    ) -> Result<Transaction> {
        let created_at = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO transactions (origin_id, destination_id, amount_cents, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(origin_id)
        .bind(destination_id)
        .bind(amount_cents)
        .bind(status.as_str())
        .bind(created_at.to_rfc3339())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to insert transaction")?;

        Ok(Transaction {
            id: row.get("id"),
            origin_id,
            destination_id,
            amount_cents,
            status,
            created_at,
        })
    }

    /// Fetch a transaction inside an open store transaction.
    pub async fn transaction_in(
        conn: &mut SqliteConnection,
        id: TransactionId,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, origin_id, destination_id, amount_cents, status, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist a new status on a transaction inside an open store transaction.
    pub async fn set_status_in(
        conn: &mut SqliteConnection,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE transactions SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *conn)
            .await
            .context("Failed to update transaction status")?;
        Ok(())
    }

    /// List all transactions, newest first (id breaks timestamp ties).
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, origin_id, destination_id, amount_cents, status, created_at
            FROM transactions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// List transactions where the user is the origin, newest first.
    pub async fn list_sent(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, origin_id, destination_id, amount_cents, status, created_at
            FROM transactions
            WHERE origin_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sent transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// List transactions where the user is the destination, newest first.
    pub async fn list_received(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, origin_id, destination_id, amount_cents, status, created_at
            FROM transactions
            WHERE destination_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list received transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: row.get("id"),
            origin_id: row.get("origin_id"),
            destination_id: row.get("destination_id"),
            amount_cents: row.get("amount_cents"),
            status: TransactionStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction status: {}", status_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
