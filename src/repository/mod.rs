//! Domain-level access to the local database.
//!
//! The local database is the source of truth. Nothing here touches the
//! network; see [`crate::remote`] for the cloud copy and [`crate::sync`] for
//! how the two are reconciled.

mod error;

pub use error::RepositoryError;

use chrono::Local;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::db::mapper::{self, UserDataHeader};
use crate::db::{HiveStore, PreferencesStore, StoreError, TaskStore, PREFERENCES_ROW_ID};
use crate::export;
use crate::models::{Hive, Task, UserData, UserPreferences};

#[derive(Debug, Clone)]
pub struct LocalRepository {
    pool: SqlitePool,
    hives: HiveStore,
    tasks: TaskStore,
    preferences: PreferencesStore,
    export_dir: PathBuf,
}

impl LocalRepository {
    pub fn new(pool: SqlitePool, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            hives: HiveStore::new(pool.clone()),
            tasks: TaskStore::new(pool.clone()),
            preferences: PreferencesStore::new(pool.clone()),
            pool,
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    // ------------------------------------------------------------------
    // Hives
    // ------------------------------------------------------------------

    pub async fn get_hive(&self, id: &str) -> Result<Hive, RepositoryError> {
        let entity = self.hives.get(id).await?;
        Ok(mapper::hive_from_entity(entity)?)
    }

    /// All hives in display order; ties are broken by id.
    pub async fn get_all_hives(&self) -> Result<Vec<Hive>, RepositoryError> {
        self.hives
            .get_all()
            .await?
            .into_iter()
            .map(|e| mapper::hive_from_entity(e).map_err(RepositoryError::from))
            .collect()
    }

    /// Fails with `Constraint` if a hive with the same id exists.
    pub async fn create_hive(&self, hive: &Hive) -> Result<(), RepositoryError> {
        self.hives.insert(&mapper::hive_to_entity(hive)?).await?;
        Ok(())
    }

    /// Full replace. Creates the hive if it does not exist yet.
    pub async fn update_hive(&self, hive: &Hive) -> Result<(), RepositoryError> {
        self.hives.upsert(&mapper::hive_to_entity(hive)?).await?;
        Ok(())
    }

    pub async fn delete_hive(&self, id: &str) -> Result<(), RepositoryError> {
        self.hives.delete(id).await?;
        Ok(())
    }

    pub async fn delete_all_hives(&self) -> Result<(), RepositoryError> {
        self.hives.delete_all().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn get_task(&self, id: Uuid) -> Result<Task, RepositoryError> {
        let entity = self.tasks.get(&id.to_string()).await?;
        Ok(mapper::task_from_entity(entity)?)
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, RepositoryError> {
        self.tasks
            .get_all()
            .await?
            .into_iter()
            .map(|e| mapper::task_from_entity(e).map_err(RepositoryError::from))
            .collect()
    }

    /// Tasks whose date is the current local calendar date.
    pub async fn get_today_tasks(&self) -> Result<Vec<Task>, RepositoryError> {
        let today = Local::now().date_naive();
        Ok(self
            .get_all_tasks()
            .await?
            .into_iter()
            .filter(|t| t.is_today_on(today))
            .collect())
    }

    pub async fn create_task(&self, task: &Task) -> Result<(), RepositoryError> {
        self.tasks.insert(&mapper::task_to_entity(task)).await?;
        Ok(())
    }

    pub async fn save_task(&self, task: &Task) -> Result<(), RepositoryError> {
        self.tasks.upsert(&mapper::task_to_entity(task)).await?;
        Ok(())
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.tasks.delete(&id.to_string()).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Preferences and the user data header
    // ------------------------------------------------------------------

    async fn load_preferences(
        &self,
    ) -> Result<Option<(UserPreferences, UserDataHeader)>, RepositoryError> {
        match self.preferences.get(PREFERENCES_ROW_ID).await {
            Ok(entity) => Ok(Some(mapper::preferences_from_entity(entity)?)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the preferences row for a fresh install.
    ///
    /// The row starts at `last_updated = 0` so that any remote copy wins the
    /// first reconciliation. Fails with `Constraint` if already initialized.
    pub async fn initialize_user(&self, user_id: &str) -> Result<(), RepositoryError> {
        let header = UserDataHeader {
            user_id: user_id.to_string(),
            last_updated: 0,
            is_user_premium: false,
        };
        let entity = mapper::preferences_to_entity(&UserPreferences::default(), &header)?;
        self.preferences.insert(&entity).await?;
        tracing::info!(user_id, "initialized local user data");
        Ok(())
    }

    /// Stored preferences, or the defaults if none have been saved.
    pub async fn get_preferences(&self) -> Result<UserPreferences, RepositoryError> {
        Ok(self
            .load_preferences()
            .await?
            .map(|(prefs, _)| prefs)
            .unwrap_or_default())
    }

    pub async fn update_preferences(
        &self,
        preferences: &UserPreferences,
    ) -> Result<(), RepositoryError> {
        let header = self.header_or_default().await?;
        let entity = mapper::preferences_to_entity(preferences, &header)?;
        self.preferences.upsert(&entity).await?;
        Ok(())
    }

    /// Records a local mutation time, the basis of last-write-wins.
    pub async fn mark_updated(&self, last_updated: i64) -> Result<(), RepositoryError> {
        let (preferences, mut header) = match self.load_preferences().await? {
            Some(loaded) => loaded,
            None => (UserPreferences::default(), default_header()),
        };
        header.last_updated = last_updated;
        let entity = mapper::preferences_to_entity(&preferences, &header)?;
        self.preferences.upsert(&entity).await?;
        Ok(())
    }

    async fn header_or_default(&self) -> Result<UserDataHeader, RepositoryError> {
        Ok(self
            .load_preferences()
            .await?
            .map(|(_, header)| header)
            .unwrap_or_else(default_header))
    }

    // ------------------------------------------------------------------
    // Whole aggregate
    // ------------------------------------------------------------------

    /// Fails with `NotFound` only if no preferences row exists.
    pub async fn get_user_data(&self) -> Result<UserData, RepositoryError> {
        let (preferences, header) = self
            .load_preferences()
            .await?
            .ok_or_else(|| RepositoryError::NotFound("user preferences".to_string()))?;

        Ok(UserData {
            user_preferences: preferences,
            hives: self.get_all_hives().await?,
            tasks: self.get_all_tasks().await?,
            last_updated: header.last_updated,
            user_id: header.user_id,
            is_user_premium: header.is_user_premium,
        })
    }

    /// Upserts the preferences row, every hive and every task in `data`.
    ///
    /// Rows missing from `data` are left alone. Each write is its own
    /// transaction, so a failure part way through leaves earlier writes in place.
    pub async fn update_user_data(&self, data: &UserData) -> Result<(), RepositoryError> {
        let header = UserDataHeader {
            user_id: data.user_id.clone(),
            last_updated: data.last_updated,
            is_user_premium: data.is_user_premium,
        };
        self.preferences
            .upsert(&mapper::preferences_to_entity(&data.user_preferences, &header)?)
            .await?;

        for hive in &data.hives {
            self.update_hive(hive).await?;
        }
        for task in &data.tasks {
            self.save_task(task).await?;
        }

        tracing::debug!(
            hives = data.hives.len(),
            tasks = data.tasks.len(),
            last_updated = data.last_updated,
            "stored user data"
        );
        Ok(())
    }

    pub async fn delete_user_data(&self) -> Result<(), RepositoryError> {
        self.preferences.delete_all().await?;
        self.hives.delete_all().await?;
        self.tasks.delete_all().await?;
        tracing::info!("cleared local user data");
        Ok(())
    }

    /// Clears local data, then stores `data`, leaving exactly its contents.
    ///
    /// Runs as one transaction: on any failure the previous local data is
    /// kept untouched.
    pub async fn replace_user_data(&self, data: &UserData) -> Result<(), RepositoryError> {
        let header = UserDataHeader {
            user_id: data.user_id.clone(),
            last_updated: data.last_updated,
            is_user_premium: data.is_user_premium,
        };
        let preferences = mapper::preferences_to_entity(&data.user_preferences, &header)?;
        let hives = data
            .hives
            .iter()
            .map(mapper::hive_to_entity)
            .collect::<Result<Vec<_>, _>>()?;
        let tasks: Vec<_> = data.tasks.iter().map(mapper::task_to_entity).collect();

        let mut tx = self.pool.begin().await?;

        PreferencesStore::delete_all_on(&mut tx).await?;
        HiveStore::delete_all_on(&mut tx).await?;
        TaskStore::delete_all_on(&mut tx).await?;

        PreferencesStore::upsert_on(&mut tx, &preferences).await?;
        for hive in &hives {
            HiveStore::upsert_on(&mut tx, hive).await?;
        }
        for task in &tasks {
            TaskStore::upsert_on(&mut tx, task).await?;
        }

        tx.commit().await?;

        tracing::info!(
            hives = hives.len(),
            tasks = tasks.len(),
            last_updated = data.last_updated,
            "replaced local user data"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Writes the hive as CSV into the export directory and returns a
    /// message naming the file.
    pub async fn export_to_csv(&self, hive: &Hive) -> Result<String, RepositoryError> {
        let dir = self.export_dir.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RepositoryError::Io(dir.clone(), e))?;

        let path = dir.join(export::export_file_name(hive));
        tokio::fs::write(&path, export::render_hive_csv(hive))
            .await
            .map_err(|e| RepositoryError::Io(path.clone(), e))?;

        tracing::info!(hive = %hive.id, path = %path.display(), "exported hive");
        Ok(format!(
            "Exported hive '{}' to {}",
            hive.details.name,
            path.display()
        ))
    }
}

fn default_header() -> UserDataHeader {
    UserDataHeader {
        user_id: String::new(),
        last_updated: 0,
        is_user_premium: false,
    }
}
