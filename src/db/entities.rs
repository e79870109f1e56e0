// Row shapes, one per table in migrations/.

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub(crate) struct HiveEntity {
    pub id: String,
    pub display_order: i64,
    /// Codec-encoded `HiveDetails`.
    pub hive_details: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub(crate) struct TaskEntity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: String,
    pub show_reminder_notification: bool,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub(crate) struct UserPreferencesEntity {
    pub id: i64,
    /// Codec-encoded `UserPreferences`.
    pub preferences: String,
    pub user_id: String,
    pub last_updated: i64,
    pub is_user_premium: bool,
}
