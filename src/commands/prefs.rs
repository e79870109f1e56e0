use clap::{Args, Subcommand};

use hivekeep::models::{TemperatureMeasurement, UserPreferences};
use hivekeep::repository::LocalRepository;

#[derive(Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub command: PrefsSubcommand,
}

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Show current preferences
    Show,

    /// Set the temperature unit
    SetUnit {
        /// celsius or fahrenheit
        unit: TemperatureMeasurement,
    },
}

impl PrefsCommand {
    /// Returns whether local data changed.
    pub async fn run(&self, repo: &LocalRepository) -> Result<bool, Box<dyn std::error::Error>> {
        match &self.command {
            PrefsSubcommand::Show => {
                let prefs = repo.get_preferences().await?;
                println!(
                    "temperature_measurement: {} ({})",
                    prefs.temperature_measurement,
                    prefs.temperature_measurement.symbol()
                );
                Ok(false)
            }
            PrefsSubcommand::SetUnit { unit } => {
                repo.update_preferences(&UserPreferences::new(*unit)).await?;
                println!("Temperature unit set to {}", unit);
                Ok(true)
            }
        }
    }
}
