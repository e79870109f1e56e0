//! Local persistence: SQLite schema, storage-shaped rows and the per-table stores.
//!
//! Row types never leave this module; callers go through
//! [`crate::repository::LocalRepository`], which maps them to domain records.

pub mod codec;
mod entities;
mod error;
mod hive_store;
pub(crate) mod mapper;
mod preferences_store;
mod task_store;

pub use codec::CodecError;
pub use error::StoreError;
pub(crate) use hive_store::HiveStore;
pub(crate) use preferences_store::{PreferencesStore, PREFERENCES_ROW_ID};
pub(crate) use task_store::TaskStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(path = %path.display(), "local database ready");

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
    (pool, temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let pool = init_db(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["hive", "task", "user_preferences"]);
    }

    #[tokio::test]
    async fn test_init_db_is_reentrant() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let first = init_db(&db_path).await.unwrap();
        first.close().await;

        assert!(init_db(&db_path).await.is_ok());
    }
}
