use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use petroforge_core::{Frame, TableName};
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::registry::{SqlValue, TableDef, TableRegistry};
use crate::store::{RecordStore, truncate_plan};

#[derive(Debug, Clone, Default)]
struct StoredTable {
    rows: Vec<Vec<SqlValue>>,
    keys: HashSet<String>,
}

/// Process-local store with the constraints of the persisted schema.
///
/// Inserts are staged on a copy of the state and swapped in only when every
/// row passes the key, parent and not-null checks.
#[derive(Debug)]
pub struct InMemoryStore {
    registry: TableRegistry,
    state: Mutex<BTreeMap<TableName, StoredTable>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(TableRegistry::standard())
    }
}

impl InMemoryStore {
    pub fn new(registry: TableRegistry) -> Self {
        Self {
            registry,
            state: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Snapshot of the stored rows of `table`, in registry column order.
    pub fn rows(&self, table: TableName) -> Result<Vec<Vec<SqlValue>>, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(state
            .get(&table)
            .map(|stored| stored.rows.clone())
            .unwrap_or_default())
    }
}

impl InMemoryStore {
    // TRUNCATE ... CASCADE also clears every table referencing a truncated one.
    fn with_dependents(&self, tables: &[TableName]) -> Vec<TableName> {
        let mut selected: Vec<TableName> = tables.to_vec();
        for def in self.registry.tables() {
            let references_selected = def
                .parents
                .iter()
                .any(|fk| selected.contains(&fk.parent));
            if references_selected && !selected.contains(&def.table) {
                selected.push(def.table);
            }
        }
        selected
    }
}

fn field_index(def: &TableDef, field: &str) -> Result<usize, StoreError> {
    def.columns
        .iter()
        .position(|column| column.field == field)
        .ok_or_else(|| StoreError::UnknownColumn {
            table: def.table.to_string(),
            column: field.to_string(),
        })
}

fn stage_table(
    staged: &mut BTreeMap<TableName, StoredTable>,
    def: &TableDef,
    frame: &Frame,
) -> Result<u64, StoreError> {
    let rows = def.encode_rows(frame)?;
    let key_idx = field_index(def, def.key)?;
    let parents = def
        .parents
        .iter()
        .map(|fk| Ok((field_index(def, fk.field)?, fk)))
        .collect::<Result<Vec<_>, StoreError>>()?;

    for row in &rows {
        for (idx, fk) in &parents {
            let parent_key = row[*idx].key();
            let known = staged
                .get(&fk.parent)
                .is_some_and(|parent| parent.keys.contains(&parent_key));
            if !known {
                return Err(StoreError::Integrity(format!(
                    "{}.{} references missing {} key '{}'",
                    def.table, fk.field, fk.parent, parent_key
                )));
            }
        }
    }

    let stored = staged.entry(def.table).or_default();
    for row in rows.iter() {
        let key = row[key_idx].key();
        if !stored.keys.insert(key.clone()) {
            return Err(StoreError::Integrity(format!(
                "duplicate key '{key}' in {}",
                def.table
            )));
        }
    }
    let inserted = rows.len() as u64;
    stored.rows.extend(rows);
    Ok(inserted)
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn count_records(
        &self,
        tables: Option<&[TableName]>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let names: Vec<TableName> = match tables {
            Some(tables) => tables.to_vec(),
            None => self.registry.tables().map(|def| def.table).collect(),
        };
        names
            .into_iter()
            .map(|table| {
                self.registry.get(table)?;
                let count = state.get(&table).map_or(0, |stored| stored.rows.len() as u64);
                Ok((table, count))
            })
            .collect()
    }

    async fn insert_records(
        &self,
        frames: &BTreeMap<TableName, Frame>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError> {
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let mut staged = state.clone();
        let mut inserted = BTreeMap::new();

        for (table, frame) in frames {
            let def = self.registry.get(*table)?;
            match stage_table(&mut staged, def, frame) {
                Ok(rows) => {
                    inserted.insert(*table, rows);
                }
                Err(err) => {
                    warn!(table = table.as_str(), error = %err, "insert rolled back");
                    return Err(err);
                }
            }
        }

        *state = staged;
        for (table, rows) in &inserted {
            info!(table = table.as_str(), rows, "rows inserted");
        }
        Ok(inserted)
    }

    async fn existing_codes(
        &self,
        table: TableName,
        column: &str,
    ) -> Result<HashSet<String>, StoreError> {
        let def = self.registry.get(table)?;
        let idx = field_index(def, column)?;
        let state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(state
            .get(&table)
            .map(|stored| stored.rows.iter().map(|row| row[idx].key()).collect())
            .unwrap_or_default())
    }

    async fn truncate(&self, tables: &[TableName], confirm: bool) -> Result<bool, StoreError> {
        if !confirm {
            warn!(engine = self.engine(), "truncate skipped without confirmation");
            return Ok(false);
        }
        for table in tables {
            self.registry.get(*table)?;
        }
        let plan = truncate_plan(&self.with_dependents(tables));
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        for table in plan {
            state.remove(&table);
            info!(table = table.as_str(), "table truncated");
        }
        Ok(true)
    }
}
