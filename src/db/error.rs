/// Errors raised by the per-table stores.
#[derive(Debug)]
pub enum StoreError {
    /// No row with this primary key.
    NotFound(String),
    /// A row with this primary key already exists.
    Constraint(String),
    /// Any other SQLite failure.
    Database(sqlx::Error),
}

impl StoreError {
    /// Classifies a failed insert, keeping duplicate keys apart from other failures.
    pub(crate) fn from_insert(id: impl Into<String>, e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.message().contains("UNIQUE constraint failed") =>
            {
                StoreError::Constraint(id.into())
            }
            _ => StoreError::Database(e),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "No row with id {}", id),
            StoreError::Constraint(id) => write!(f, "A row with id {} already exists", id),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}
