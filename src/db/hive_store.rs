use sqlx::{SqliteConnection, SqlitePool};

use super::entities::HiveEntity;
use super::error::StoreError;

/// Row access for the `hive` table.
#[derive(Debug, Clone)]
pub(crate) struct HiveStore {
    pool: SqlitePool,
}

impl HiveStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Strict insert; fails with `Constraint` if the id is taken.
    pub async fn insert(&self, entity: &HiveEntity) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO hive (id, display_order, hive_details) VALUES (?, ?, ?)")
            .bind(&entity.id)
            .bind(entity.display_order)
            .bind(&entity.hive_details)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_insert(&entity.id, e))?;

        tracing::debug!(id = %entity.id, "inserted hive");
        Ok(())
    }

    pub async fn upsert(&self, entity: &HiveEntity) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::upsert_on(&mut conn, entity).await
    }

    /// `upsert` on a caller-held connection, e.g. inside a transaction.
    pub async fn upsert_on(
        conn: &mut SqliteConnection,
        entity: &HiveEntity,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO hive (id, display_order, hive_details)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                display_order = excluded.display_order,
                hive_details = excluded.hive_details
            "#,
        )
        .bind(&entity.id)
        .bind(entity.display_order)
        .bind(&entity.hive_details)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(id = %entity.id, "upserted hive");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<HiveEntity, StoreError> {
        sqlx::query_as("SELECT id, display_order, hive_details FROM hive WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn get_all(&self) -> Result<Vec<HiveEntity>, StoreError> {
        let rows = sqlx::query_as(
            "SELECT id, display_order, hive_details FROM hive ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM hive WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_all_on(&mut conn).await
    }

    pub async fn delete_all_on(conn: &mut SqliteConnection) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM hive").execute(&mut *conn).await?;
        tracing::debug!(rows = result.rows_affected(), "cleared hive table");
        Ok(())
    }
}
