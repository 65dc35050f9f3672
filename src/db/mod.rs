use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::models::{Client, ClientPayload};

const CREATE_CLIENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS clients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        balance REAL DEFAULT 0,
        workplace TEXT
    )
"#;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(config.database_url())?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// A private in-memory database, used by tests.
    ///
    /// Every connection to `sqlite::memory:` opens a fresh database, so the
    /// pool is pinned to one connection that never expires.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the clients table if it is not there yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_CLIENTS_TABLE)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Client operations
    pub async fn list_clients(&self) -> Result<Vec<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, CAST(COALESCE(balance, 0) AS REAL) AS balance, workplace
            FROM clients
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn create_client(&self, client: &ClientPayload) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, phone, balance, workplace)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&client.name)
        .bind(&client.phone)
        .bind(client.balance.unwrap_or_default())
        .bind(&client.workplace)
        .execute(self.get_pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrite every editable field of a client.
    ///
    /// Returns `false` when no row has the given id; nothing is changed then.
    pub async fn update_client(&self, id: i64, client: &ClientPayload) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, phone = ?, balance = ?, workplace = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.phone)
        .bind(client.balance.unwrap_or_default())
        .bind(&client.workplace)
        .bind(id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no row has the given id.
    pub async fn delete_client(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    db.ensure_schema().await?;
    info!(url = config.database_url(), "database ready");

    Ok(db)
}
