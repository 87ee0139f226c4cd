//! Declarative schema contracts for the Petroforge tables.
//!
//! Each table has one [`TableSchema`]: an ordered list of column contracts
//! checked by a single routine that collects every violation before failing.

pub mod contract;
pub mod engine;
pub mod errors;
pub mod model;
pub mod report;
pub mod schemas;
pub mod tables;

pub use contract::{Check, ColumnContract, ColumnKind, TableSchema};
pub use engine::validate_frame;
pub use errors::{SchemaErrors, ValidationError};
pub use model::{Violation, ViolationCode};
pub use report::render_violations;
pub use schemas::schema_for;
pub use tables::{
    validate_equipment, validate_incidents, validate_production, validate_table, validate_wells,
};
