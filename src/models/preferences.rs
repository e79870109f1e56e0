use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureMeasurement {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureMeasurement {
    /// Unit suffix used when printing readings.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureMeasurement::Celsius => "°C",
            TemperatureMeasurement::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureMeasurement::Celsius => write!(f, "celsius"),
            TemperatureMeasurement::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

impl FromStr for TemperatureMeasurement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureMeasurement::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureMeasurement::Fahrenheit),
            _ => Err(format!(
                "Invalid temperature unit '{}'. Valid options: celsius, fahrenheit",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub temperature_measurement: TemperatureMeasurement,
}

impl UserPreferences {
    pub fn new(temperature_measurement: TemperatureMeasurement) -> Self {
        Self {
            temperature_measurement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fahrenheit() {
        assert_eq!(
            UserPreferences::default().temperature_measurement,
            TemperatureMeasurement::Fahrenheit
        );
    }

    #[test]
    fn test_temperature_measurement_from_str() {
        assert_eq!(
            TemperatureMeasurement::from_str("Celsius").unwrap(),
            TemperatureMeasurement::Celsius
        );
        assert_eq!(
            TemperatureMeasurement::from_str("F").unwrap(),
            TemperatureMeasurement::Fahrenheit
        );
        assert!(TemperatureMeasurement::from_str("kelvin").is_err());
    }

    #[test]
    fn test_temperature_measurement_json() {
        let json = serde_json::to_string(&TemperatureMeasurement::Celsius).unwrap();
        assert_eq!(json, "\"celsius\"");
    }

    #[test]
    fn test_missing_field_defaults() {
        let prefs: UserPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, UserPreferences::default());
    }
}
