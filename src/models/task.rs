use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Calendar format used for `Task::date`.
pub const TASK_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub show_reminder_notification: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            date: date.format(TASK_DATE_FORMAT).to_string(),
            show_reminder_notification: false,
            is_completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_reminder(mut self, remind: bool) -> Self {
        self.show_reminder_notification = remind;
        self
    }

    /// Returns a completed copy of this task.
    pub fn completed(&self) -> Self {
        Self {
            is_completed: true,
            ..self.clone()
        }
    }

    /// Parses `date`; `None` if it is not in `YYYY-MM-DD` form.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, TASK_DATE_FORMAT).ok()
    }

    pub fn is_today(&self) -> bool {
        self.is_today_on(Local::now().date_naive())
    }

    pub fn is_today_on(&self, today: NaiveDate) -> bool {
        self.parsed_date() == Some(today)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_completed { "x" } else { " " };
        write!(f, "[{}] {} {}", mark, self.date, self.title)?;
        if !self.category.is_empty() {
            write!(f, " ({})", self.category)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_task_new_formats_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let task = Task::new("Feed syrup", date);
        assert_eq!(task.date, "2025-03-07");
        assert_eq!(task.parsed_date(), Some(date));
        assert!(!task.is_completed);
    }

    #[test]
    fn test_is_today() {
        let today = Local::now().date_naive();
        let yesterday = today - Duration::days(1);

        assert!(Task::new("Today", today).is_today());
        assert!(!Task::new("Yesterday", yesterday).is_today());
    }

    #[test]
    fn test_unparseable_date_is_never_today() {
        let mut task = Task::new("Broken", Local::now().date_naive());
        task.date = "07.03.2025".to_string();
        assert!(task.parsed_date().is_none());
        assert!(!task.is_today());
    }

    #[test]
    fn test_completed_copy() {
        let task = Task::new("Check mites", NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        let done = task.completed();
        assert!(done.is_completed);
        assert_eq!(done.id, task.id);
        assert!(!task.is_completed);
    }

    #[test]
    fn test_task_display() {
        let task = Task::new("Harvest", NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
            .with_category("honey");
        assert_eq!(format!("{}", task), "[ ] 2025-08-01 Harvest (honey)");
    }
}
