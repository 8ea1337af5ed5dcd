//! SQLite connection pool setup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::DbPool;

/// Pool settings for the student store.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a writer waits on SQLite's lock before failing.
    pub busy_timeout: Duration,
    /// Close connections idle this long. `None` keeps them open, which an
    /// in-memory database needs to survive.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 8,
            busy_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl PoolConfig {
    /// One long-lived connection, so every query sees the same `:memory:` database.
    pub fn test() -> Self {
        Self {
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
            idle_timeout: None,
        }
    }
}

/// Open a pool on `path`, creating the file and its parent directories.
pub async fn create_pool_with_config(path: &str, config: PoolConfig) -> Result<DbPool> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Round-trip a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_is_single_connection() {
        let pool = create_pool_with_config(":memory:", PoolConfig::test())
            .await
            .unwrap();

        assert_eq!(pool.options().get_max_connections(), 1);
        health_check(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");
        let pool = create_pool_with_config(path.to_str().unwrap(), PoolConfig::default())
            .await
            .unwrap();

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
