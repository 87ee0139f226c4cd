//! Synthetic data generation engine for Petroforge.
//!
//! Produces interrelated batches of wells, equipment, production records and
//! incidents. Downstream tables only reference keys and dates drawn from the
//! upstream tables they are given, and every entity code is unique against
//! both the persisted store and the current run.

mod batch;
pub mod codes;
pub mod context;
pub mod equipment;
pub mod errors;
pub mod incidents;
pub mod model;
pub mod output;
pub mod production;
pub mod sampling;
pub mod wells;

pub use codes::{CodeAllocator, CodeTemplate};
pub use context::GenerationContext;
pub use errors::GenerationError;
pub use model::{
    BatchSizes, DataGenerator, GenerateOptions, GeneratedTables, GenerationOutcome, OutcomeError,
};
