//! SQLite client
//!
//! Connection pool with settings suited to a single-node deployment.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use crate::error::Result;
use crate::schema::init_schema;

/// Pool sizing and locking options
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct SqliteClient {
    pool: SqlitePool,
    db_path: String,
}

impl SqliteClient {
    /// Open (or create) a database file and ensure the schema exists
    pub async fn new(db_path: impl AsRef<Path>, options: ClientOptions) -> Result<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    crate::StoreError::Database(format!(
                        "Cannot create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .journal_mode(SqliteJournalMode::Wal) // Enable WAL for concurrent reads
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(options.busy_timeout)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect_options)
            .await?;

        init_schema(&pool).await?;

        info!("SQLite database connected: {}", db_path_str);

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    /// Private in-memory database with the schema applied
    ///
    /// Single connection that is never recycled: every connection to
    /// `:memory:` sees its own database, so closing this one loses the data.
    pub async fn in_memory() -> Result<Self> {
        let connect_options =
            SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?;

        init_schema(&pool).await?;

        Ok(Self {
            pool,
            db_path: ":memory:".to_string(),
        })
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get database file path
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Check if database is accessible
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panelmap.db");

        let client = SqliteClient::new(&path, ClientOptions::default())
            .await
            .unwrap();
        client.ping().await.unwrap();

        assert!(path.exists());
        assert_eq!(client.path(), path.to_string_lossy());
    }

    #[tokio::test]
    async fn test_in_memory_has_schema() {
        let client = SqliteClient::in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('panels', 'breakers', 'devices')",
        )
        .fetch_one(client.pool())
        .await
        .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_in_memory_keeps_its_connection() {
        let client = SqliteClient::in_memory().await.unwrap();
        let options = client.pool().options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        sqlx::query("INSERT INTO panels (name) VALUES ('Main')")
            .execute(client.pool())
            .await
            .unwrap();

        // A later checkout still sees the same database
        let mut conn = client.pool().acquire().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM panels")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
