use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a hive stands. Embedded in the hive payload rather than stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apiary {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl Apiary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub date: NaiveDate,
    #[serde(default)]
    pub queen_seen: bool,
    #[serde(default)]
    pub brood_frames: Option<u32>,
    /// Reading in the unit the user had selected at the time.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl Inspection {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            queen_seen: false,
            brood_frames: None,
            temperature: None,
            notes: String::new(),
        }
    }

    pub fn with_queen_seen(mut self, queen_seen: bool) -> Self {
        self.queen_seen = queen_seen;
        self
    }

    pub fn with_brood_frames(mut self, frames: u32) -> Self {
        self.brood_frames = Some(frames);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Everything about a hive that storage treats as a single opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiveDetails {
    pub name: String,
    #[serde(default)]
    pub apiary: Option<Apiary>,
    #[serde(default)]
    pub queen_year: Option<i32>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub inspections: Vec<Inspection>,
}

impl HiveDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apiary: None,
            queen_year: None,
            notes: String::new(),
            inspections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hive {
    pub id: String,
    pub display_order: i64,
    pub details: HiveDetails,
}

impl Hive {
    /// Creates a hive with a freshly generated id.
    pub fn new(name: impl Into<String>, display_order: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, display_order)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, display_order: i64) -> Self {
        Self {
            id: id.into(),
            display_order,
            details: HiveDetails::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn with_apiary(mut self, apiary: Apiary) -> Self {
        self.details.apiary = Some(apiary);
        self
    }

    pub fn with_queen_year(mut self, year: i32) -> Self {
        self.details.queen_year = Some(year);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.details.notes = notes.into();
        self
    }

    pub fn with_inspection(mut self, inspection: Inspection) -> Self {
        self.details.inspections.push(inspection);
        self
    }

    /// Returns a copy carrying a new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut hive = self.clone();
        hive.details.name = name.into();
        hive
    }

    /// Most recent inspection by date, if any.
    pub fn last_inspection(&self) -> Option<&Inspection> {
        self.details.inspections.iter().max_by_key(|i| i.date)
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.details.name)?;
        writeln!(f, "{}", "=".repeat(self.details.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Order: {}", self.display_order)?;

        if let Some(apiary) = &self.details.apiary {
            match &apiary.location {
                Some(location) => writeln!(f, "Apiary: {} ({})", apiary.name, location)?,
                None => writeln!(f, "Apiary: {}", apiary.name)?,
            }
        }
        if let Some(year) = self.details.queen_year {
            writeln!(f, "Queen: {}", year)?;
        }
        if !self.details.notes.is_empty() {
            writeln!(f, "\n{}", self.details.notes)?;
        }

        if !self.details.inspections.is_empty() {
            writeln!(f, "\nInspections:")?;
            for inspection in &self.details.inspections {
                write!(f, "  - {}", inspection.date)?;
                if inspection.queen_seen {
                    write!(f, " (queen seen)")?;
                }
                if let Some(frames) = inspection.brood_frames {
                    write!(f, ", {} brood frames", frames)?;
                }
                if !inspection.notes.is_empty() {
                    write!(f, ": {}", inspection.notes)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_hive_new_generates_id() {
        let a = Hive::new("North", 0);
        let b = Hive::new("North", 0);
        assert_ne!(a.id, b.id);
        assert_eq!(a.name(), "North");
        assert!(a.details.inspections.is_empty());
    }

    #[test]
    fn test_renamed_keeps_everything_else() {
        let hive = Hive::with_id("h1", "Old", 3)
            .with_queen_year(2024)
            .with_inspection(Inspection::new(date(2025, 5, 1)));
        let renamed = hive.renamed("New");

        assert_eq!(renamed.name(), "New");
        assert_eq!(renamed.id, "h1");
        assert_eq!(renamed.display_order, 3);
        assert_eq!(renamed.details.inspections.len(), 1);
        assert_eq!(hive.name(), "Old");
    }

    #[test]
    fn test_last_inspection() {
        let hive = Hive::with_id("h1", "Hive", 0)
            .with_inspection(Inspection::new(date(2025, 6, 1)).with_notes("second"))
            .with_inspection(Inspection::new(date(2025, 4, 1)).with_notes("first"));

        assert_eq!(hive.last_inspection().unwrap().notes, "second");
        assert!(Hive::with_id("h2", "Empty", 0).last_inspection().is_none());
    }

    #[test]
    fn test_hive_display() {
        let hive = Hive::with_id("h1", "Linden", 1)
            .with_apiary(Apiary::new("Home").with_location("Garden"))
            .with_inspection(
                Inspection::new(date(2025, 5, 1))
                    .with_queen_seen(true)
                    .with_brood_frames(6),
            );

        let output = format!("{}", hive);
        assert!(output.contains("Linden"));
        assert!(output.contains("Apiary: Home (Garden)"));
        assert!(output.contains("2025-05-01 (queen seen), 6 brood frames"));
    }
}
