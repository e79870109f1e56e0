use sqlx::{SqliteConnection, SqlitePool};

use super::entities::UserPreferencesEntity;
use super::error::StoreError;

/// The preferences table only ever holds this row.
pub(crate) const PREFERENCES_ROW_ID: i64 = 0;

#[derive(Debug, Clone)]
pub(crate) struct PreferencesStore {
    pool: SqlitePool,
}

impl PreferencesStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entity: &UserPreferencesEntity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (id, preferences, user_id, last_updated, is_user_premium)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entity.id)
        .bind(&entity.preferences)
        .bind(&entity.user_id)
        .bind(entity.last_updated)
        .bind(entity.is_user_premium)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(entity.id.to_string(), e))?;
        Ok(())
    }

    pub async fn upsert(&self, entity: &UserPreferencesEntity) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::upsert_on(&mut conn, entity).await
    }

    pub async fn upsert_on(
        conn: &mut SqliteConnection,
        entity: &UserPreferencesEntity,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (id, preferences, user_id, last_updated, is_user_premium)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                preferences = excluded.preferences,
                user_id = excluded.user_id,
                last_updated = excluded.last_updated,
                is_user_premium = excluded.is_user_premium
            "#,
        )
        .bind(entity.id)
        .bind(&entity.preferences)
        .bind(&entity.user_id)
        .bind(entity.last_updated)
        .bind(entity.is_user_premium)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(last_updated = entity.last_updated, "upserted user preferences");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<UserPreferencesEntity, StoreError> {
        sqlx::query_as("SELECT * FROM user_preferences WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn delete_all(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_all_on(&mut conn).await
    }

    pub async fn delete_all_on(conn: &mut SqliteConnection) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM user_preferences")
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
