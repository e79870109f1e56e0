//! Sync CLI commands for reconciling with the remote store.

use clap::{Args, Subcommand};

use hivekeep::config::Config;
use hivekeep::remote::{check_server, RemoteError, RemoteRepository};
use hivekeep::repository::LocalRepository;
use hivekeep::sync::{reconcile, SyncError, SyncOutcome};

/// Sync with remote server
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and server status
    Status,
}

impl SyncCommand {
    pub async fn run(&self, repo: &LocalRepository, config: &Config) -> Result<(), SyncError> {
        match &self.command {
            None => self.sync(repo, config).await,
            Some(SyncSubcommand::Status) => {
                self.status(config).await;
                Ok(())
            }
        }
    }

    async fn sync(&self, repo: &LocalRepository, config: &Config) -> Result<(), SyncError> {
        let remote = RemoteRepository::connect(&config.sync)
            .await
            .map_err(SyncError::Remote)?;

        println!(
            "Syncing with {} as {}...",
            remote.server_url(),
            remote.identity().user_id
        );

        match reconcile(repo, &remote).await? {
            SyncOutcome::PulledRemote { last_updated } => {
                println!("✓ pulled newer remote copy (last updated {})", last_updated)
            }
            SyncOutcome::PushedLocal { last_updated } => {
                println!("✓ pushed local copy (last updated {})", last_updated)
            }
            SyncOutcome::NothingToSync => println!("Nothing to sync."),
        }
        Ok(())
    }

    async fn status(&self, config: &Config) {
        println!("Sync Configuration");
        println!("==================");
        println!();

        let (Some(server_url), Some(api_key)) = (&config.sync.server_url, &config.sync.api_key)
        else {
            println!("Status: Not configured");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  sync:");
            println!("    server_url: \"http://localhost:8080\"");
            println!("    api_key: \"your-api-key\"");
            println!("    auto_sync: false");
            println!();
            println!("Or set environment variables:");
            println!("  HIVEKEEP_SYNC_URL");
            println!("  HIVEKEEP_SYNC_API_KEY");
            return;
        };

        println!("Server:    {}", server_url);
        println!("API Key:   {}...", mask_key(api_key));
        println!(
            "Auto-sync: {}",
            if config.sync.auto_sync {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!();

        if !check_server(server_url).await {
            println!("Server status: ✗ unreachable");
            return;
        }

        match RemoteRepository::connect(&config.sync).await {
            Ok(remote) => println!(
                "Server status: ✓ connected as {}",
                remote.identity().user_id
            ),
            Err(RemoteError::NotAuthenticated) => println!("Server status: ✗ API key rejected"),
            Err(e) => println!("Server status: ✗ error: {}", e),
        }
    }
}

/// First eight characters of the key, on a char boundary.
fn mask_key(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}
