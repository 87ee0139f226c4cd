use thiserror::Error;

use petroforge_core::CoreError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("code space {prefix}* has {available} unused codes, {requested} requested")]
    CodeSpaceExhausted {
        prefix: &'static str,
        requested: usize,
        available: usize,
    },
    #[error("no unused {prefix}* code found after {attempts} attempts")]
    CodeRetriesExhausted { prefix: &'static str, attempts: u32 },
    #[error("draw budget of {budget} exhausted for {table}")]
    DrawBudgetExhausted { table: &'static str, budget: usize },
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("empty catalog: {0}")]
    EmptyCatalog(&'static str),
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// Errors after which no further record of the table can be produced.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerationError::CodeSpaceExhausted { .. }
                | GenerationError::CodeRetriesExhausted { .. }
                | GenerationError::InvalidWeights(_)
                | GenerationError::EmptyCatalog(_)
        )
    }
}
