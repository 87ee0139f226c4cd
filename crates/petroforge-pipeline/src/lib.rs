//! Pipeline controller: generate, validate, insert and report.

pub mod controller;
pub mod errors;
pub mod log;
pub mod summary;

pub use controller::{PipelineController, PipelineOptions};
pub use errors::PipelineError;
pub use log::{ExecutionLog, PipelineStatus};
pub use summary::render_summary;
