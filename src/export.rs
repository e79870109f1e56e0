//! CSV rendering of a hive and its inspection history.
//!
//! One row per inspection. A hive without inspections still gets one row
//! with the inspection columns left empty. Text fields are always quoted.

use crate::models::{Hive, Inspection};

pub const CSV_HEADER: &str = "hive_id,hive_name,apiary,display_order,inspection_date,queen_seen,brood_frames,temperature,notes";

/// Wraps a text field in double quotes, doubling any embedded quotes.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn hive_columns(hive: &Hive) -> String {
    let apiary = hive
        .details
        .apiary
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("");
    format!(
        "{},{},{},{}",
        quote(&hive.id),
        quote(&hive.details.name),
        quote(apiary),
        hive.display_order
    )
}

fn inspection_columns(inspection: &Inspection) -> String {
    format!(
        "{},{},{},{},{}",
        quote(&inspection.date.to_string()),
        inspection.queen_seen,
        inspection
            .brood_frames
            .map(|n| n.to_string())
            .unwrap_or_default(),
        inspection
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_default(),
        quote(&inspection.notes)
    )
}

/// Renders the full CSV document, header included, newline terminated.
pub fn render_hive_csv(hive: &Hive) -> String {
    let prefix = hive_columns(hive);
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    if hive.details.inspections.is_empty() {
        out.push_str(&prefix);
        out.push_str(",,,,,\n");
        return out;
    }

    for inspection in &hive.details.inspections {
        out.push_str(&prefix);
        out.push(',');
        out.push_str(&inspection_columns(inspection));
        out.push('\n');
    }
    out
}

/// File name for a hive export: a filesystem-safe slug of the name plus the id.
pub fn export_file_name(hive: &Hive) -> String {
    let slug: String = hive
        .details
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    let id: String = hive
        .id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if slug.is_empty() {
        format!("hive-{}.csv", id)
    } else {
        format!("{}-{}.csv", slug, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Apiary;
    use chrono::NaiveDate;

    #[test]
    fn test_quote_escapes_quotes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_comma_in_name_is_quoted() {
        let hive = Hive::with_id("h1", "North, by the shed", 0);
        let csv = render_hive_csv(&hive);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "\"h1\",\"North, by the shed\",\"\",0,,,,,");
    }

    #[test]
    fn test_one_row_per_inspection() {
        let hive = Hive::with_id("h1", "Linden", 2)
            .with_apiary(Apiary::new("Home"))
            .with_inspection(
                Inspection::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
                    .with_queen_seen(true)
                    .with_brood_frames(5)
                    .with_temperature(18.5)
                    .with_notes("calm"),
            )
            .with_inspection(Inspection::new(NaiveDate::from_ymd_opt(2025, 5, 9).unwrap()));

        let csv = render_hive_csv(&hive);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"h1\",\"Linden\",\"Home\",2,\"2025-05-01\",true,5,18.5,\"calm\""
        );
        assert_eq!(
            lines[2],
            "\"h1\",\"Linden\",\"Home\",2,\"2025-05-09\",false,,,\"\""
        );
    }

    #[test]
    fn test_export_file_name() {
        let hive = Hive::with_id("abc-123", "North, by the shed", 0);
        assert_eq!(export_file_name(&hive), "north--by-the-shed-abc-123.csv");

        let hive = Hive::with_id("../x", "***", 0);
        assert_eq!(export_file_name(&hive), "hive-x.csv");
    }
}
