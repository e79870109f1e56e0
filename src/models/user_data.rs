use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hive::Hive;
use super::preferences::UserPreferences;
use super::task::Task;

/// Milliseconds since the Unix epoch, the unit of `UserData::last_updated`.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Everything a user owns, synced with the remote store as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub user_preferences: UserPreferences,
    #[serde(default)]
    pub hives: Vec<Hive>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub last_updated: i64,
    pub user_id: String,
    #[serde(default)]
    pub is_user_premium: bool,
}

impl UserData {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_preferences: UserPreferences::default(),
            hives: Vec::new(),
            tasks: Vec::new(),
            last_updated: 0,
            user_id: user_id.into(),
            is_user_premium: false,
        }
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.user_preferences = preferences;
        self
    }

    pub fn with_hives(mut self, hives: Vec<Hive>) -> Self {
        self.hives = hives;
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_premium(mut self, premium: bool) -> Self {
        self.is_user_premium = premium;
        self
    }

    /// Returns a copy stamped with the given mutation time.
    pub fn touched(mut self, last_updated: i64) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// Hives in display order, ties broken by id.
    pub fn sorted_hives(&self) -> Vec<Hive> {
        let mut hives = self.hives.clone();
        hives.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.id.cmp(&b.id))
        });
        hives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_data_new() {
        let data = UserData::new("user-1");
        assert_eq!(data.user_id, "user-1");
        assert_eq!(data.last_updated, 0);
        assert!(data.hives.is_empty());
        assert!(!data.is_user_premium);
    }

    #[test]
    fn test_touched_sets_timestamp() {
        let before = now_millis();
        let data = UserData::new("u").touched(now_millis());
        assert!(data.last_updated >= before);
    }

    #[test]
    fn test_sorted_hives_breaks_ties_by_id() {
        let data = UserData::new("u").with_hives(vec![
            Hive::with_id("c", "C", 1),
            Hive::with_id("b", "B", 0),
            Hive::with_id("a", "A", 1),
        ]);

        let ids: Vec<String> = data.sorted_hives().into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
