//! Conversions between table rows and domain records. No I/O happens here.

use uuid::Uuid;

use super::codec::{self, CodecError};
use super::entities::{HiveEntity, TaskEntity, UserPreferencesEntity};
use super::PREFERENCES_ROW_ID;
use crate::models::{Hive, Task, UserPreferences};

pub(crate) fn hive_to_entity(hive: &Hive) -> Result<HiveEntity, CodecError> {
    Ok(HiveEntity {
        id: hive.id.clone(),
        display_order: hive.display_order,
        hive_details: codec::encode(&hive.details)?,
    })
}

pub(crate) fn hive_from_entity(entity: HiveEntity) -> Result<Hive, CodecError> {
    Ok(Hive {
        details: codec::decode(&entity.hive_details)?,
        id: entity.id,
        display_order: entity.display_order,
    })
}

pub(crate) fn task_to_entity(task: &Task) -> TaskEntity {
    TaskEntity {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        category: task.category.clone(),
        date: task.date.clone(),
        show_reminder_notification: task.show_reminder_notification,
        is_completed: task.is_completed,
    }
}

pub(crate) fn task_from_entity(entity: TaskEntity) -> Result<Task, CodecError> {
    let id = Uuid::parse_str(&entity.id).map_err(|_| CodecError::InvalidField {
        field: "task id",
        value: entity.id.clone(),
    })?;

    Ok(Task {
        id,
        title: entity.title,
        description: entity.description,
        category: entity.category,
        date: entity.date,
        show_reminder_notification: entity.show_reminder_notification,
        is_completed: entity.is_completed,
    })
}

/// Header fields stored alongside the preferences blob.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UserDataHeader {
    pub user_id: String,
    pub last_updated: i64,
    pub is_user_premium: bool,
}

pub(crate) fn preferences_to_entity(
    preferences: &UserPreferences,
    header: &UserDataHeader,
) -> Result<UserPreferencesEntity, CodecError> {
    Ok(UserPreferencesEntity {
        id: PREFERENCES_ROW_ID,
        preferences: codec::encode(preferences)?,
        user_id: header.user_id.clone(),
        last_updated: header.last_updated,
        is_user_premium: header.is_user_premium,
    })
}

pub(crate) fn preferences_from_entity(
    entity: UserPreferencesEntity,
) -> Result<(UserPreferences, UserDataHeader), CodecError> {
    let preferences = codec::decode(&entity.preferences)?;
    let header = UserDataHeader {
        user_id: entity.user_id,
        last_updated: entity.last_updated,
        is_user_premium: entity.is_user_premium,
    };
    Ok((preferences, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Apiary, Inspection, TemperatureMeasurement};
    use chrono::NaiveDate;

    #[test]
    fn test_hive_roundtrip() {
        let hive = Hive::with_id("h-1", "Acacia, East", 4)
            .with_apiary(Apiary::new("Orchard").with_location("Upper field"))
            .with_queen_year(2024)
            .with_notes("Strong colony")
            .with_inspection(
                Inspection::new(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap())
                    .with_queen_seen(true)
                    .with_brood_frames(7)
                    .with_temperature(68.0),
            );

        let entity = hive_to_entity(&hive).unwrap();
        assert_eq!(entity.id, "h-1");
        assert_eq!(entity.display_order, 4);

        assert_eq!(hive_from_entity(entity).unwrap(), hive);
    }

    #[test]
    fn test_hive_from_corrupt_entity_fails() {
        let entity = HiveEntity {
            id: "h-1".to_string(),
            display_order: 0,
            hive_details: "not json".to_string(),
        };
        assert!(hive_from_entity(entity).is_err());
    }

    #[test]
    fn test_task_roundtrip() {
        let task = Task::new("Add super", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .with_description("Before the lime flow")
            .with_category("hive")
            .with_reminder(true);

        assert_eq!(task_from_entity(task_to_entity(&task)).unwrap(), task);
    }

    #[test]
    fn test_task_with_bad_id_fails() {
        let mut entity = task_to_entity(&Task::new(
            "x",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        ));
        entity.id = "not-a-uuid".to_string();

        let err = task_from_entity(entity).unwrap_err();
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn test_preferences_roundtrip_keeps_header() {
        let prefs = UserPreferences::new(TemperatureMeasurement::Celsius);
        let header = UserDataHeader {
            user_id: "user-9".to_string(),
            last_updated: 1_700_000_000_000,
            is_user_premium: true,
        };

        let entity = preferences_to_entity(&prefs, &header).unwrap();
        assert_eq!(entity.id, PREFERENCES_ROW_ID);

        let (decoded, decoded_header) = preferences_from_entity(entity).unwrap();
        assert_eq!(decoded, prefs);
        assert_eq!(decoded_header, header);
    }
}
