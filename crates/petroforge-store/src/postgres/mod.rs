use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use petroforge_core::{Frame, TableName};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::registry::TableRegistry;
use crate::store::{RecordStore, truncate_plan};

mod queries;

pub use queries::create_table_sql;

/// Store backed by a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    registry: TableRegistry,
}

impl PostgresStore {
    /// Create a new store using a pre-configured pool.
    pub fn new(pool: PgPool, registry: TableRegistry) -> Self {
        Self { pool, registry }
    }

    pub async fn connect(url: &str, registry: TableRegistry) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;
        Ok(Self::new(pool, registry))
    }

    /// Create the registered tables that do not exist yet, parents first.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for def in self.registry.tables() {
            let ddl = create_table_sql(def, &self.registry)?;
            sqlx::query(&ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!(tables = self.registry.tables().count(), "schema ensured");
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresStore {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn count_records(
        &self,
        tables: Option<&[TableName]>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError> {
        let names: Vec<TableName> = match tables {
            Some(tables) => tables.to_vec(),
            None => self.registry.tables().map(|def| def.table).collect(),
        };
        let mut tx = self.pool.begin().await?;
        let mut counts = BTreeMap::new();
        for table in names {
            let def = self.registry.get(table)?;
            counts.insert(table, queries::count_rows(&mut tx, def).await?);
        }
        tx.commit().await?;
        Ok(counts)
    }

    async fn insert_records(
        &self,
        frames: &BTreeMap<TableName, Frame>,
    ) -> Result<BTreeMap<TableName, u64>, StoreError> {
        let mut encoded = Vec::with_capacity(frames.len());
        for (table, frame) in frames {
            let def = self.registry.get(*table)?;
            encoded.push((def, def.encode_rows(frame)?));
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = BTreeMap::new();
        for (def, rows) in encoded {
            match queries::insert_rows(&mut tx, def, rows).await {
                Ok(count) => {
                    inserted.insert(def.table, count);
                }
                Err(err) => {
                    warn!(table = def.sql_name(), error = %err, "insert rolled back");
                    if let Err(rollback) = tx.rollback().await {
                        warn!(error = %rollback, "rollback failed");
                    }
                    return Err(err);
                }
            }
        }
        tx.commit().await?;

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
        let sql_column = def.column(column)?.sql;
        let mut conn = self.pool.acquire().await?;
        let values = queries::select_column(&mut conn, def, sql_column).await?;
        Ok(values.into_iter().collect())
    }

    async fn truncate(&self, tables: &[TableName], confirm: bool) -> Result<bool, StoreError> {
        if !confirm {
            warn!(engine = self.engine(), "truncate skipped without confirmation");
            return Ok(false);
        }
        for table in tables {
            self.registry.get(*table)?;
        }

        let mut tx = self.pool.begin().await?;
        for table in truncate_plan(tables) {
            if let Err(err) = queries::truncate_table(&mut tx, table).await {
                warn!(table = table.as_str(), error = %err, "truncate rolled back");
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                return Err(err);
            }
            info!(table = table.as_str(), "table truncated");
        }
        tx.commit().await?;
        Ok(true)
    }
}
