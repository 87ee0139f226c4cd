use thiserror::Error;

/// Errors emitted by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Duplicate key, missing parent, null or check constraint violation.
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unknown column '{column}' for table {table}")]
    UnknownColumn { table: String, column: String },
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("cannot encode {table}.{column}: {message}")]
    Encode {
        table: String,
        column: String,
        message: String,
    },
    #[error("store state lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, StoreError::Integrity(_))
    }
}
