use petroforge_generate::OutcomeError;
use petroforge_store::StoreError;
use petroforge_validate::ValidationError;
use thiserror::Error;

use crate::log::PipelineStatus;

/// Errors emitted by the pipeline controller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pipeline transition from {from} to {to}")]
    InvalidTransition {
        from: PipelineStatus,
        to: PipelineStatus,
    },
    #[error("generation failed: {0}")]
    Generation(#[from] OutcomeError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
