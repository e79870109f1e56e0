//! Reconciliation after local writes when `auto_sync` is enabled.
//!
//! The CLI must keep working offline, so nothing here is an error for the
//! caller: every result is reported as an [`AutoSync`] value.

use super::{reconcile, SyncError, SyncOutcome};
use crate::config::SyncConfig;
use crate::remote::{check_server, RemoteRepository};
use crate::repository::LocalRepository;

#[derive(Debug)]
pub enum AutoSync {
    /// `auto_sync` is off or sync is not configured.
    Disabled,
    /// The server did not answer its health check.
    Unreachable,
    Synced(SyncOutcome),
    Failed(SyncError),
}

/// Reconciles with the configured server if auto-sync is on and it is reachable.
pub async fn try_auto_sync(local: &LocalRepository, config: &SyncConfig) -> AutoSync {
    if !config.auto_sync || !config.is_configured() {
        return AutoSync::Disabled;
    }
    let Some(url) = config.server_url.as_deref() else {
        return AutoSync::Disabled;
    };

    if !check_server(url).await {
        tracing::debug!(url, "auto-sync skipped, server unreachable");
        return AutoSync::Unreachable;
    }

    let remote = match RemoteRepository::connect(config).await {
        Ok(remote) => remote,
        Err(e) => return AutoSync::Failed(SyncError::Remote(e)),
    };

    match reconcile(local, &remote).await {
        Ok(outcome) => AutoSync::Synced(outcome),
        Err(e) => AutoSync::Failed(e),
    }
}
