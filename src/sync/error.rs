use crate::remote::RemoteError;
use crate::repository::RepositoryError;

/// Errors that can occur while reconciling.
#[derive(Debug)]
pub enum SyncError {
    /// Reading or writing the local copy failed
    Local(RepositoryError),
    /// Talking to the remote store failed
    Remote(RemoteError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Local(e) => write!(f, "Local sync error: {}", e),
            SyncError::Remote(e) => write!(f, "Remote sync error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Local(e) => Some(e),
            SyncError::Remote(e) => Some(e),
        }
    }
}
