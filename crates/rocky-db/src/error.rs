//! Database-specific error types and conversions.

use rocky_core::error::RockyError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Duplicate { entity: String },

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

impl DbError {
    /// Classify a failed write: unique index violations become
    /// [`DbError::Duplicate`], anything else is kept as a query failure.
    pub(crate) fn from_write(entity: &str, err: surrealdb::Error) -> Self {
        if err.to_string().contains("already contains") {
            DbError::Duplicate {
                entity: entity.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for RockyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RockyError::NotFound { entity, id },
            DbError::Duplicate { entity } => RockyError::AlreadyExists { entity },
            other => RockyError::Database(other.to_string()),
        }
    }
}
