mod hive;
mod preferences;
mod task;
mod user_data;

pub use hive::{Apiary, Hive, HiveDetails, Inspection};
pub use preferences::{TemperatureMeasurement, UserPreferences};
pub use task::{Task, TASK_DATE_FORMAT};
pub use user_data::{now_millis, UserData};
