//! Last-write-wins reconciliation between the local and remote copies.
//!
//! The copy with the strictly greater `last_updated` wins wholesale. There is
//! no field merge and no detection of concurrent edits beyond that single
//! timestamp. On a tie the local copy is kept and pushed again.

mod auto_sync;
mod error;

pub use auto_sync::{try_auto_sync, AutoSync};
pub use error::SyncError;

use crate::models::UserData;
use crate::remote::RemoteUserData;
use crate::repository::{LocalRepository, RepositoryError};

/// Which way data should flow for a pair of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Pull,
    Push,
}

/// What a reconciliation did.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The remote copy was newer and replaced local data.
    PulledRemote { last_updated: i64 },
    /// The local copy was pushed to the remote store.
    PushedLocal { last_updated: i64 },
    /// Neither side has any data.
    NothingToSync,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::PulledRemote { last_updated } => {
                write!(f, "pulled remote copy (last updated {})", last_updated)
            }
            SyncOutcome::PushedLocal { last_updated } => {
                write!(f, "pushed local copy (last updated {})", last_updated)
            }
            SyncOutcome::NothingToSync => write!(f, "nothing to sync"),
        }
    }
}

/// Remote wins only when strictly newer.
pub fn decide(local_last_updated: i64, remote_last_updated: i64) -> Direction {
    if remote_last_updated > local_last_updated {
        Direction::Pull
    } else {
        Direction::Push
    }
}

/// Reconciles the local repository with the remote store.
///
/// A missing local copy counts as older than any remote copy. Remote
/// failures are returned to the caller; local data is never discarded
/// unless a newer remote copy was successfully fetched.
pub async fn reconcile<R: RemoteUserData>(
    local: &LocalRepository,
    remote: &R,
) -> Result<SyncOutcome, SyncError> {
    let local_data = match local.get_user_data().await {
        Ok(data) => Some(data),
        Err(RepositoryError::NotFound(_)) => None,
        Err(e) => return Err(SyncError::Local(e)),
    };
    let remote_data = remote.get_user_data().await.map_err(SyncError::Remote)?;

    match (local_data, remote_data) {
        (None, None) => {
            tracing::info!("no local or remote user data, nothing to sync");
            Ok(SyncOutcome::NothingToSync)
        }
        (None, Some(remote_data)) => pull(local, remote_data).await,
        (Some(local_data), None) => push(remote, local_data).await,
        (Some(local_data), Some(remote_data)) => {
            match decide(local_data.last_updated, remote_data.last_updated) {
                Direction::Pull => pull(local, remote_data).await,
                Direction::Push => push(remote, local_data).await,
            }
        }
    }
}

async fn pull(local: &LocalRepository, data: UserData) -> Result<SyncOutcome, SyncError> {
    local
        .replace_user_data(&data)
        .await
        .map_err(SyncError::Local)?;
    tracing::info!(last_updated = data.last_updated, "remote copy is newer, replaced local data");
    Ok(SyncOutcome::PulledRemote {
        last_updated: data.last_updated,
    })
}

async fn push<R: RemoteUserData>(remote: &R, data: UserData) -> Result<SyncOutcome, SyncError> {
    remote
        .update_user_data(&data)
        .await
        .map_err(SyncError::Remote)?;
    tracing::info!(last_updated = data.last_updated, "pushed local copy");
    Ok(SyncOutcome::PushedLocal {
        last_updated: data.last_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::{Hive, Task};
    use crate::remote::RemoteError;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory stand-in for the remote store.
    #[derive(Default)]
    struct MemoryRemote {
        data: Mutex<Option<UserData>>,
        pushes: Mutex<usize>,
        offline: bool,
    }

    impl MemoryRemote {
        fn with(data: UserData) -> Self {
            Self {
                data: Mutex::new(Some(data)),
                ..Default::default()
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Default::default()
            }
        }

        fn stored(&self) -> Option<UserData> {
            self.data.lock().unwrap().clone()
        }

        fn push_count(&self) -> usize {
            *self.pushes.lock().unwrap()
        }
    }

    impl RemoteUserData for MemoryRemote {
        async fn get_user_data(&self) -> Result<Option<UserData>, RemoteError> {
            if self.offline {
                return Err(RemoteError::Http("connection refused".to_string()));
            }
            Ok(self.stored())
        }

        async fn update_user_data(&self, data: &UserData) -> Result<(), RemoteError> {
            if self.offline {
                return Err(RemoteError::Http("connection refused".to_string()));
            }
            *self.data.lock().unwrap() = Some(data.clone());
            *self.pushes.lock().unwrap() += 1;
            Ok(())
        }
    }

    async fn setup_local() -> (LocalRepository, TempDir) {
        let (pool, temp_dir) = test_pool().await;
        (LocalRepository::new(pool, temp_dir.path()), temp_dir)
    }

    fn user_data(hive_ids: &[&str], last_updated: i64) -> UserData {
        UserData::new("user-1")
            .with_hives(
                hive_ids
                    .iter()
                    .enumerate()
                    .map(|(i, id)| Hive::with_id(*id, format!("Hive {}", id), i as i64))
                    .collect(),
            )
            .touched(last_updated)
    }

    #[test]
    fn test_decide() {
        assert_eq!(decide(100, 200), Direction::Pull);
        assert_eq!(decide(200, 100), Direction::Push);
        assert_eq!(decide(100, 100), Direction::Push);
    }

    #[tokio::test]
    async fn test_newer_remote_replaces_local_exactly() {
        let (local, _temp) = setup_local().await;
        local
            .update_user_data(&user_data(&["local-a", "local-b"], 100))
            .await
            .unwrap();

        let remote_copy = user_data(&["remote-x"], 200).with_tasks(vec![Task::new(
            "Requeen",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        )]);
        let remote = MemoryRemote::with(remote_copy.clone());

        let outcome = reconcile(&local, &remote).await.unwrap();

        assert_eq!(outcome, SyncOutcome::PulledRemote { last_updated: 200 });
        assert_eq!(local.get_user_data().await.unwrap(), remote_copy);
        assert_eq!(remote.push_count(), 0);
    }

    #[tokio::test]
    async fn test_tie_keeps_local_and_pushes() {
        let (local, _temp) = setup_local().await;
        let local_copy = user_data(&["local-a"], 100);
        local.update_user_data(&local_copy).await.unwrap();

        let remote = MemoryRemote::with(user_data(&["remote-x"], 100));
        let outcome = reconcile(&local, &remote).await.unwrap();

        assert_eq!(outcome, SyncOutcome::PushedLocal { last_updated: 100 });
        assert_eq!(local.get_user_data().await.unwrap(), local_copy);
        assert_eq!(remote.stored(), Some(local_copy));
    }

    #[tokio::test]
    async fn test_newer_local_is_pushed() {
        let (local, _temp) = setup_local().await;
        let local_copy = user_data(&["local-a"], 300);
        local.update_user_data(&local_copy).await.unwrap();

        let remote = MemoryRemote::with(user_data(&["remote-x"], 200));
        let outcome = reconcile(&local, &remote).await.unwrap();

        assert_eq!(outcome, SyncOutcome::PushedLocal { last_updated: 300 });
        assert_eq!(remote.stored(), Some(local_copy));
    }

    #[tokio::test]
    async fn test_empty_remote_receives_local() {
        let (local, _temp) = setup_local().await;
        local
            .update_user_data(&user_data(&["a"], 10))
            .await
            .unwrap();

        let remote = MemoryRemote::default();
        let outcome = reconcile(&local, &remote).await.unwrap();

        assert_eq!(outcome, SyncOutcome::PushedLocal { last_updated: 10 });
        assert_eq!(remote.push_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_local_pulls_remote() {
        let (local, _temp) = setup_local().await;
        let remote_copy = user_data(&["r"], 0);
        let remote = MemoryRemote::with(remote_copy.clone());

        let outcome = reconcile(&local, &remote).await.unwrap();

        assert_eq!(outcome, SyncOutcome::PulledRemote { last_updated: 0 });
        assert_eq!(local.get_user_data().await.unwrap(), remote_copy);
    }

    #[tokio::test]
    async fn test_nothing_on_either_side() {
        let (local, _temp) = setup_local().await;
        let remote = MemoryRemote::default();

        assert_eq!(
            reconcile(&local, &remote).await.unwrap(),
            SyncOutcome::NothingToSync
        );
    }

    #[tokio::test]
    async fn test_offline_remote_leaves_local_untouched() {
        let (local, _temp) = setup_local().await;
        let local_copy = user_data(&["a", "b"], 50);
        local.update_user_data(&local_copy).await.unwrap();

        let err = reconcile(&local, &MemoryRemote::offline())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Remote(RemoteError::Http(_))));
        assert_eq!(local.get_user_data().await.unwrap(), local_copy);
    }

    #[tokio::test]
    async fn test_failed_pull_keeps_local_and_never_pushes_partial_copy() {
        let (pool, temp_dir) = test_pool().await;
        let local = LocalRepository::new(pool.clone(), temp_dir.path());
        let local_copy = user_data(&["mine"], 100);
        local.update_user_data(&local_copy).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_hive_b BEFORE INSERT ON hive WHEN NEW.id = 'b' \
             BEGIN SELECT RAISE(ABORT, 'hive b rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let remote_copy = user_data(&["a", "b"], 200);
        let remote = MemoryRemote::with(remote_copy.clone());

        let err = reconcile(&local, &remote).await.unwrap_err();
        assert!(matches!(err, SyncError::Local(_)));
        assert_eq!(local.get_user_data().await.unwrap(), local_copy);

        // Local still reads as older, so a retry pulls again instead of pushing
        assert!(reconcile(&local, &remote).await.is_err());
        assert_eq!(remote.push_count(), 0);
        assert_eq!(remote.stored(), Some(remote_copy));
    }
}
