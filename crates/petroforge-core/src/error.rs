use thiserror::Error;

/// Core error type shared across Petroforge crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A label or code outside the closed domain of a column.
    #[error("unknown {domain} value '{value}'")]
    UnknownLabel { domain: &'static str, value: String },
    /// A column required by a record is absent from the frame.
    #[error("missing column '{0}'")]
    MissingColumn(String),
    /// A cell holds a value of the wrong kind for the record field.
    #[error("column '{column}' expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Two rows of the same table share a key.
    #[error("duplicate key '{key}' in {table}")]
    DuplicateKey { table: &'static str, key: String },
    /// A row does not line up with the frame header.
    #[error("row has {found} values but frame has {expected} columns")]
    MisalignedRow { expected: usize, found: usize },
}

/// Convenience alias for results returned by Petroforge core helpers.
pub type Result<T> = std::result::Result<T, CoreError>;
