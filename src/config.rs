//! CLI configuration: `config.yaml` overridden by `HIVEKEEP_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Remote sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Server URL (e.g., "http://localhost:8080")
    pub server_url: Option<String>,
    /// API key identifying the signed-in user
    pub api_key: Option<String>,
    /// Reconcile after every local write (default: false)
    #[serde(default)]
    pub auto_sync: bool,
}

impl SyncConfig {
    /// Returns true if sync is configured (has both server_url and api_key)
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub database_path: PathBuf,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
    /// The file that was read, if one existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    sync: Option<SyncConfig>,
}

impl Config {
    /// Defaults under the user data directory, e.g. ~/.local/share/hivekeep/
    fn defaults() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hivekeep");
        Self {
            database_path: data_dir.join("hivekeep.db"),
            export_dir: data_dir.join("exports"),
            config_file: None,
            sync: SyncConfig::default(),
        }
    }

    /// Loads `config_path` (or the default path) if it exists, then applies
    /// environment overrides.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            config.merge_file(&path)?;
        }
        config.merge_env(|name| std::env::var(name).ok());

        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        let file: ConfigFile = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;

        if let Some(db_path) = file.database_path {
            self.database_path = resolve_relative(path, db_path);
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = resolve_relative(path, dir);
        }
        if let Some(sync) = file.sync {
            self.sync = sync;
        }
        self.config_file = Some(path.to_path_buf());
        Ok(())
    }

    fn merge_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(db_path) = var("HIVEKEEP_DATABASE_PATH") {
            self.database_path = PathBuf::from(db_path);
        }
        if let Some(dir) = var("HIVEKEEP_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("HIVEKEEP_SYNC_URL") {
            self.sync.server_url = Some(url);
        }
        if let Some(key) = var("HIVEKEEP_SYNC_API_KEY") {
            self.sync.api_key = Some(key);
        }
    }

    /// e.g. ~/.config/hivekeep/config.yaml on Linux
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hivekeep")
            .join("config.yaml")
    }
}

/// Relative paths in the config file are relative to the file's directory.
fn resolve_relative(config_path: &Path, value: PathBuf) -> PathBuf {
    match config_path.parent() {
        Some(dir) if value.is_relative() => dir.join(value),
        _ => value,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
