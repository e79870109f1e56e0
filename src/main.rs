use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, HiveCommand, PrefsCommand, SyncCommand, TaskCommand};
use hivekeep::config::{Config, SyncConfig};
use hivekeep::db::init_db;
use hivekeep::models::now_millis;
use hivekeep::repository::{LocalRepository, RepositoryError};
use hivekeep::sync::{try_auto_sync, AutoSync};

#[derive(Parser)]
#[command(name = "hivekeep")]
#[command(version)]
#[command(about = "Beekeeping records with cloud sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage hives and inspections
    Hive(HiveCommand),

    /// Manage tasks
    Task(TaskCommand),

    /// Manage preferences
    Prefs(PrefsCommand),

    /// Sync with remote server
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hivekeep=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let pool = init_db(&config.database_path).await?;
    let repo = LocalRepository::new(pool, config.export_dir.clone());
    ensure_user(&repo).await?;

    let changed = match &command {
        Commands::Hive(cmd) => cmd.run(&repo).await?,
        Commands::Task(cmd) => cmd.run(&repo).await?,
        Commands::Prefs(cmd) => cmd.run(&repo).await?,
        Commands::Sync(cmd) => {
            cmd.run(&repo, &config).await?;
            false
        }
        Commands::Config(_) => false,
    };

    if changed {
        record_local_write(&repo, &config.sync, now_millis()).await?;
    }

    Ok(())
}

/// Stamps a local mutation, then reconciles if auto-sync is on.
async fn record_local_write(
    repo: &LocalRepository,
    sync: &SyncConfig,
    at: i64,
) -> Result<(), RepositoryError> {
    repo.mark_updated(at).await?;

    match try_auto_sync(repo, sync).await {
        AutoSync::Disabled => {}
        AutoSync::Unreachable => eprintln!("Auto-sync: server unreachable, skipping"),
        AutoSync::Synced(outcome) => tracing::info!(%outcome, "auto-sync finished"),
        AutoSync::Failed(e) => eprintln!("Auto-sync: {}", e),
    }
    Ok(())
}

/// Creates the local user row on first run.
async fn ensure_user(repo: &LocalRepository) -> Result<(), RepositoryError> {
    match repo.initialize_user("").await {
        Ok(()) | Err(RepositoryError::Constraint(_)) => Ok(()),
        Err(e) => Err(e),
    }
}
