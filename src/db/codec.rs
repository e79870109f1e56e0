//! Text encoding for values SQLite has no column type for.
//!
//! Values are stored as JSON. Decoding is all-or-nothing: a malformed blob
//! fails the whole read of the row it belongs to.

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug)]
pub enum CodecError {
    /// The text is not valid JSON for the expected shape.
    Json(serde_json::Error),
    /// A plain column holds a value that cannot be parsed.
    InvalidField { field: &'static str, value: String },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Json(e) => write!(f, "Malformed payload: {}", e),
            CodecError::InvalidField { field, value } => {
                write!(f, "Malformed payload: invalid {} '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(e) => Some(e),
            CodecError::InvalidField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HiveDetails, Inspection, TemperatureMeasurement, UserPreferences};
    use chrono::NaiveDate;

    #[test]
    fn test_preferences_roundtrip() {
        for unit in [
            TemperatureMeasurement::Celsius,
            TemperatureMeasurement::Fahrenheit,
        ] {
            let prefs = UserPreferences::new(unit);
            let decoded: UserPreferences = decode(&encode(&prefs).unwrap()).unwrap();
            assert_eq!(decoded, prefs);
        }
    }

    #[test]
    fn test_hive_details_roundtrip_with_inspections() {
        let mut details = HiveDetails::new("Quoted \"name\", with comma");
        details.inspections.push(
            Inspection::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
                .with_temperature(21.5)
                .with_notes("calm"),
        );

        let decoded: HiveDetails = decode(&encode(&details).unwrap()).unwrap();
        assert_eq!(decoded, details);
    }

    #[test]
    fn test_decode_malformed_fails() {
        let result: Result<UserPreferences, _> = decode("{\"temperature_measurement\":");
        assert!(result.is_err());

        let result: Result<UserPreferences, _> =
            decode("{\"temperature_measurement\":\"kelvin\"}");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Malformed payload"));
    }
}
