use rusqlite::ErrorCode;
use thiserror::Error;

/// Failures of collection store operations.
///
/// The `Display` text is the message handed back to API clients, so keep it
/// human-readable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Card ID {id} is already in the collection.")]
    AlreadyInCollection { id: String },

    #[error("Missing set ID required for database integrity.")]
    MissingSetId,

    #[error("Database error (integrity constraint failed); transaction rolled back.")]
    Integrity(#[source] rusqlite::Error),

    #[error("Card ID {id} not found.")]
    NotFound { id: String },

    #[error("Unexpected DB error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    /// The blocking task running the operation panicked or was cancelled.
    #[error("Database worker failed: {0}")]
    Worker(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Self::Integrity(e)
            }
            _ => Self::Database(e),
        }
    }
}
