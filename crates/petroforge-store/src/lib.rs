//! Persistence collaborator for the Petroforge tables.
//!
//! Stores implement [`RecordStore`]. Each one is built around an injected
//! [`TableRegistry`] that maps frame columns to persisted columns.

pub mod errors;
pub mod memory;
pub mod postgres;
pub mod registry;
pub mod store;

pub use errors::StoreError;
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use registry::{ColumnDef, ForeignKeyDef, SqlType, SqlValue, TableDef, TableRegistry};
pub use store::RecordStore;
