//! Database layer for Roster.
//!
//! Provides SQLite connection pooling and the student record queries.

mod pool;
mod students;

pub use pool::*;
pub use students::*;

use crate::Result;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool with default settings.
///
/// Creates parent directories if needed and configures SQLite for
/// concurrent access.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    let pool = create_pool_with_config(path, PoolConfig::default()).await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    for statement in schema_statements(schema) {
        sqlx::query(&statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Split a schema script into statements.
///
/// `--` comments are removed before splitting on `;`, so a semicolon inside
/// a comment never ends a statement. The schema has no string literals
/// containing `--`.
fn schema_statements(schema: &str) -> Vec<String> {
    let without_comments = schema
        .lines()
        .map(|line| line.split_once("--").map_or(line, |(sql, _)| sql))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let pool = create_pool_with_config(":memory:", PoolConfig::test())
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(table_names, vec!["students"]);
    }

    #[test]
    fn test_schema_statements_ignore_semicolons_in_comments() {
        let script = "-- header; with a semicolon\n\
                      CREATE TABLE a (x TEXT); -- trailing; note\n\
                      -- between; statements\n\
                      CREATE TABLE b (y TEXT);\n";

        let statements = schema_statements(script);

        assert_eq!(
            statements,
            vec!["CREATE TABLE a (x TEXT)", "CREATE TABLE b (y TEXT)"]
        );
    }

    #[test]
    fn test_bundled_schema_has_only_sql_statements() {
        let statements = schema_statements(include_str!("../../schema.sql"));

        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS students"));
    }

    #[tokio::test]
    async fn test_init_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("roster.db");

        let pool = init_pool(path.to_str().unwrap()).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        assert!(path.exists());
    }
}
