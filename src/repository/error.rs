use std::path::PathBuf;

use crate::db::{CodecError, StoreError};

/// Errors returned by [`super::LocalRepository`].
#[derive(Debug)]
pub enum RepositoryError {
    /// Requested record does not exist.
    NotFound(String),
    /// A record with this id already exists.
    Constraint(String),
    /// A stored payload could not be decoded.
    Decode(CodecError),
    /// Writing a file (export) failed.
    Io(PathBuf, std::io::Error),
    /// SQLite failure.
    Database(sqlx::Error),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound(id) => write!(f, "Not found: {}", id),
            RepositoryError::Constraint(id) => write!(f, "Already exists: {}", id),
            RepositoryError::Decode(e) => write!(f, "Decode error: {}", e),
            RepositoryError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            RepositoryError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Decode(e) => Some(e),
            RepositoryError::Io(_, e) => Some(e),
            RepositoryError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => RepositoryError::NotFound(id),
            StoreError::Constraint(id) => RepositoryError::Constraint(id),
            StoreError::Database(e) => RepositoryError::Database(e),
        }
    }
}

impl From<CodecError> for RepositoryError {
    fn from(e: CodecError) -> Self {
        RepositoryError::Decode(e)
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Database(e)
    }
}
