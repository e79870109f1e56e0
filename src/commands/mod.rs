use clap::ValueEnum;

mod config_cmd;
mod hive;
mod prefs;
mod sync_cmd;
mod task;

pub use config_cmd::ConfigCommand;
pub use hive::HiveCommand;
#[cfg(test)]
pub use hive::HiveSubcommand;
pub use prefs::PrefsCommand;
#[cfg(test)]
pub use prefs::PrefsSubcommand;
pub use sync_cmd::SyncCommand;
pub use task::TaskCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
