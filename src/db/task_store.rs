use sqlx::{SqliteConnection, SqlitePool};

use super::entities::TaskEntity;
use super::error::StoreError;

#[derive(Debug, Clone)]
pub(crate) struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entity: &TaskEntity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO task (id, title, description, category, date, show_reminder_notification, is_completed)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entity.id)
        .bind(&entity.title)
        .bind(&entity.description)
        .bind(&entity.category)
        .bind(&entity.date)
        .bind(entity.show_reminder_notification)
        .bind(entity.is_completed)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(&entity.id, e))?;
        Ok(())
    }

    pub async fn upsert(&self, entity: &TaskEntity) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::upsert_on(&mut conn, entity).await
    }

    pub async fn upsert_on(
        conn: &mut SqliteConnection,
        entity: &TaskEntity,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO task (id, title, description, category, date, show_reminder_notification, is_completed)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                category = excluded.category,
                date = excluded.date,
                show_reminder_notification = excluded.show_reminder_notification,
                is_completed = excluded.is_completed
            "#,
        )
        .bind(&entity.id)
        .bind(&entity.title)
        .bind(&entity.description)
        .bind(&entity.category)
        .bind(&entity.date)
        .bind(entity.show_reminder_notification)
        .bind(entity.is_completed)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(id = %entity.id, "upserted task");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<TaskEntity, StoreError> {
        sqlx::query_as("SELECT * FROM task WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn get_all(&self) -> Result<Vec<TaskEntity>, StoreError> {
        let rows = sqlx::query_as("SELECT * FROM task ORDER BY date, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM task WHERE id = ?")
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
        sqlx::query("DELETE FROM task").execute(&mut *conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn entity(id: &str, date: &str) -> TaskEntity {
        TaskEntity {
            id: id.to_string(),
            title: format!("task {}", id),
            description: String::new(),
            category: "hive".to_string(),
            date: date.to_string(),
            show_reminder_notification: true,
            is_completed: false,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_duplicate() {
        let (pool, _temp) = test_pool().await;
        let store = TaskStore::new(pool);

        let row = entity("t1", "2025-05-01");
        store.insert(&row).await.unwrap();
        assert_eq!(store.get("t1").await.unwrap(), row);

        assert!(matches!(
            store.insert(&row).await,
            Err(StoreError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_replaces_flags() {
        let (pool, _temp) = test_pool().await;
        let store = TaskStore::new(pool);

        let mut row = entity("t1", "2025-05-01");
        store.upsert(&row).await.unwrap();
        row.is_completed = true;
        row.show_reminder_notification = false;
        store.upsert(&row).await.unwrap();

        let fetched = store.get("t1").await.unwrap();
        assert!(fetched.is_completed);
        assert!(!fetched.show_reminder_notification);
    }

    #[tokio::test]
    async fn test_get_all_sorted_by_date_and_delete() {
        let (pool, _temp) = test_pool().await;
        let store = TaskStore::new(pool);

        store.insert(&entity("late", "2025-09-01")).await.unwrap();
        store.insert(&entity("early", "2025-01-01")).await.unwrap();

        let ids: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);

        store.delete("early").await.unwrap();
        store.delete("early").await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 1);

        store.delete_all().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
