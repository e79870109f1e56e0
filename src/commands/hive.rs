use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use std::io::{self, Write};

use hivekeep::models::{Apiary, Hive, Inspection};
use hivekeep::repository::LocalRepository;

use super::OutputFormat;

#[derive(Args)]
pub struct HiveCommand {
    #[command(subcommand)]
    pub command: HiveSubcommand,
}

#[derive(Subcommand)]
pub enum HiveSubcommand {
    /// Create a new hive
    Create {
        /// Name of the hive
        name: String,

        /// Explicit id (generated if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Position in the hive list (appended if omitted)
        #[arg(long)]
        order: Option<i64>,

        /// Apiary the hive stands in
        #[arg(long)]
        apiary: Option<String>,

        /// Apiary location
        #[arg(long, requires = "apiary")]
        location: Option<String>,

        /// Year the queen was introduced
        #[arg(long)]
        queen_year: Option<i32>,
    },

    /// List all hives
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a hive's details
    Show {
        /// Hive ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename a hive
    Rename {
        /// Hive ID
        id: String,

        /// New name
        name: String,
    },

    /// Record an inspection
    Inspect {
        /// Hive ID
        id: String,

        /// Inspection date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// The queen was seen
        #[arg(long)]
        queen_seen: bool,

        /// Number of frames with brood
        #[arg(long)]
        brood_frames: Option<u32>,

        /// Temperature reading in the preferred unit
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f64>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a hive
    Delete {
        /// Hive ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Delete every hive
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Export a hive and its inspections as CSV
    Export {
        /// Hive ID
        id: String,
    },
}

impl HiveCommand {
    /// Returns whether local data changed.
    pub async fn run(&self, repo: &LocalRepository) -> Result<bool, Box<dyn std::error::Error>> {
        self.execute(repo, confirm).await
    }

    async fn execute(
        &self,
        repo: &LocalRepository,
        confirm: impl Fn(&str) -> io::Result<bool>,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        match &self.command {
            HiveSubcommand::Create {
                name,
                id,
                order,
                apiary,
                location,
                queen_year,
            } => {
                let order = match order {
                    Some(order) => *order,
                    None => next_display_order(&repo.get_all_hives().await?)
                        .ok_or("no display order left after the last hive, pass --order")?,
                };

                let mut hive = match id {
                    Some(id) => Hive::with_id(id.clone(), name.clone(), order),
                    None => Hive::new(name.clone(), order),
                };
                if let Some(apiary_name) = apiary {
                    let mut apiary = Apiary::new(apiary_name.clone());
                    if let Some(location) = location {
                        apiary = apiary.with_location(location.clone());
                    }
                    hive = hive.with_apiary(apiary);
                }
                if let Some(year) = queen_year {
                    hive = hive.with_queen_year(*year);
                }

                repo.create_hive(&hive).await?;
                println!("Created hive: {} ({})", hive.name(), hive.id);
                Ok(true)
            }

            HiveSubcommand::List { format } => {
                let hives = repo.get_all_hives().await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&hives)?);
                    }
                    OutputFormat::Text => {
                        if hives.is_empty() {
                            println!("No hives found.");
                        } else {
                            for hive in &hives {
                                let last = hive
                                    .last_inspection()
                                    .map(|i| i.date.to_string())
                                    .unwrap_or_else(|| "never".to_string());
                                println!(
                                    "{:>3}  {}  {}  (last inspected: {})",
                                    hive.display_order,
                                    hive.id,
                                    hive.name(),
                                    last
                                );
                            }
                        }
                    }
                }
                Ok(false)
            }

            HiveSubcommand::Show { id, format } => {
                let hive = repo.get_hive(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&hive)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", hive);
                        let unit = repo.get_preferences().await?.temperature_measurement;
                        if let Some(reading) = hive.last_inspection().and_then(|i| i.temperature) {
                            println!("\nLast temperature: {:.1}{}", reading, unit.symbol());
                        }
                    }
                }
                Ok(false)
            }

            HiveSubcommand::Rename { id, name } => {
                let hive = repo.get_hive(id).await?.renamed(name.clone());
                repo.update_hive(&hive).await?;
                println!("Renamed hive {} to {}", hive.id, hive.name());
                Ok(true)
            }

            HiveSubcommand::Inspect {
                id,
                date,
                queen_seen,
                brood_frames,
                temperature,
                notes,
            } => {
                let hive = repo.get_hive(id).await?;

                let mut inspection = Inspection::new(date.unwrap_or_else(|| Local::now().date_naive()))
                    .with_queen_seen(*queen_seen);
                if let Some(frames) = brood_frames {
                    inspection = inspection.with_brood_frames(*frames);
                }
                if let Some(reading) = temperature {
                    inspection = inspection.with_temperature(*reading);
                }
                if let Some(notes) = notes {
                    inspection = inspection.with_notes(notes.clone());
                }

                let date = inspection.date;
                let hive = hive.with_inspection(inspection);
                repo.update_hive(&hive).await?;
                println!("Recorded inspection of {} on {}", hive.name(), date);
                Ok(true)
            }

            HiveSubcommand::Delete { id, force } => {
                let hive = repo.get_hive(id).await?;

                if !force && !confirm(&format!("Delete hive '{}'?", hive.name()))? {
                    println!("Cancelled.");
                    return Ok(false);
                }

                repo.delete_hive(&hive.id).await?;
                println!("Deleted hive: {}", hive.name());
                Ok(true)
            }

            HiveSubcommand::Clear { force } => {
                let count = repo.get_all_hives().await?.len();
                if count == 0 {
                    println!("No hives to delete.");
                    return Ok(false);
                }

                if !force && !confirm(&format!("Delete all {} hives?", count))? {
                    println!("Cancelled.");
                    return Ok(false);
                }

                repo.delete_all_hives().await?;
                println!("Deleted {} hives.", count);
                Ok(true)
            }

            HiveSubcommand::Export { id } => {
                let hive = repo.get_hive(id).await?;
                println!("{}", repo.export_to_csv(&hive).await?);
                Ok(false)
            }
        }
    }
}

/// One past the highest existing order, or 0 for the first hive.
/// `None` once the highest order is `i64::MAX`.
fn next_display_order(hives: &[Hive]) -> Option<i64> {
    match hives.iter().map(|h| h.display_order).max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
