//! Core contracts and helpers for Petroforge.
//!
//! This crate defines the oil & gas entity records, their closed domains,
//! the typed and dynamic table models, and utilities shared by the
//! generator, validator, store and CLI crates.

pub mod domain;
pub mod entities;
pub mod error;
pub mod frame;
pub mod redaction;
pub mod table;
pub mod value;

pub use domain::{
    Basin, Brand, EquipmentType, GeologicLayer, IncidentType, OperationalStatus, Operator,
    ResolutionStatus, Severity, WellType,
};
pub use entities::{Equipment, Incident, ProductionRecord, Well};
pub use error::{CoreError, Result};
pub use frame::{Frame, RowView};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use table::{Record, Table, TableName};
pub use value::Value;
