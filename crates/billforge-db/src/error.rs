//! # Store Errors
//!
//! ```text
//! sqlx::Error / MigrateError
//!        │
//!        ▼
//!     DbError ──► CLI (NotFound → 5, UniqueViolation → 6, rest → 1)
//! ```
//!
//! Repository methods add the document number where sqlx cannot know it,
//! e.g. a UNIQUE failure is re-labelled with the rejected number.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No invoice or quotation with that number.
    ///
    /// ## When This Occurs
    /// - `delete` or `render` of a number that was never saved
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Document numbers are unique per document type.
    ///
    /// ## When This Occurs
    /// - Saving a second invoice (or quotation) with an existing number
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Missing parent directory or no write permission
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row holds a value that cannot be read back.
    ///
    /// ## When This Occurs
    /// - A decimal column was edited by hand into something non-numeric
    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Another process held the file lock past the busy timeout.
    #[error("Document store is busy; try again")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// ```text
/// RowNotFound                    → NotFound
/// Database, unique violation     → UniqueViolation (columns from the message)
/// Database, other                → QueryFailed
/// PoolTimedOut                   → PoolExhausted
/// PoolClosed                     → ConnectionFailed
/// anything else                  → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                // "UNIQUE constraint failed: documents.doc_type, documents.doc_number"
                ErrorKind::UniqueViolation => {
                    let field = db_err
                        .message()
                        .rsplit(": ")
                        .next()
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::duplicate(field, "unknown")
                }
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
