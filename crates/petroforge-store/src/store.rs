use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use petroforge_core::{Frame, TableName};

use crate::errors::StoreError;

/// Trait implemented by stores that persist the Petroforge tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Row count per table. `None` counts every registered table.
    async fn count_records(
        &self,
        tables: Option<&[TableName]>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError>;

    /// Insert every frame atomically, parents first.
    ///
    /// Either all rows are committed or none are. Returns rows inserted per table.
    async fn insert_records(
        &self,
        frames: &BTreeMap<TableName, Frame>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError>;

    /// Every persisted value of a frame column.
    async fn existing_codes(
        &self,
        table: TableName,
        column: &str,
    ) -> Result<HashSet<String>, StoreError>;

    /// Remove every row of `tables`, children first. A no-op returning
    /// `false` unless `confirm` is set.
    async fn truncate(&self, tables: &[TableName], confirm: bool) -> Result<bool, StoreError>;
}

/// `tables` in children-first order, without duplicates.
pub(crate) fn truncate_plan(tables: &[TableName]) -> Vec<TableName> {
    TableName::truncate_order()
        .into_iter()
        .filter(|table| tables.contains(table))
        .collect()
}
