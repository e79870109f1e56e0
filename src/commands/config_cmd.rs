use clap::{Args, Subcommand};

use hivekeep::config::Config;

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(config)?);
                }
                OutputFormat::Text => {
                    println!("Configuration");
                    println!("=============\n");

                    match &config.config_file {
                        Some(path) => println!("Config file: {}", path.display()),
                        None => println!(
                            "Config file: {} (not found)",
                            Config::default_config_path().display()
                        ),
                    }
                    println!();

                    println!("database_path: {}", config.database_path.display());
                    println!("export_dir: {}", config.export_dir.display());

                    println!(
                        "sync.server_url: {}",
                        config.sync.server_url.as_deref().unwrap_or("(not set)")
                    );
                    println!(
                        "sync.api_key: {}",
                        if config.sync.api_key.is_some() {
                            "(set)"
                        } else {
                            "(not set)"
                        }
                    );
                    println!("sync.auto_sync: {}", config.sync.auto_sync);
                }
            },
        }
        Ok(())
    }
}
