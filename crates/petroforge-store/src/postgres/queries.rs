use sqlx::postgres::Postgres;
use sqlx::{PgConnection, QueryBuilder};

use petroforge_core::TableName;

use crate::errors::StoreError;
use crate::registry::{SqlValue, TableDef, TableRegistry};

/// Largest number of rows bound in a single INSERT statement.
const INSERT_CHUNK_ROWS: usize = 1_000;

/// DDL of one table, surrogate id and insertion timestamp included.
pub fn create_table_sql(def: &TableDef, registry: &TableRegistry) -> Result<String, StoreError> {
    let mut columns = vec!["id SERIAL PRIMARY KEY".to_string()];
    for column in &def.columns {
        let mut ddl = format!("{} {} NOT NULL", column.sql, column.sql_type.ddl());
        if column.field == def.key {
            ddl.push_str(" UNIQUE");
        }
        if let Some(fk) = def.parents.iter().find(|fk| fk.field == column.field) {
            let parent = registry.get(fk.parent)?;
            ddl.push_str(&format!(
                " REFERENCES {} ({})",
                parent.sql_name(),
                parent.key_column()?.sql
            ));
        }
        columns.push(ddl);
    }
    columns.push("data_insercao TIMESTAMP NOT NULL DEFAULT now()".to_string());

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        def.sql_name(),
        columns.join(",\n    ")
    ))
}

pub async fn count_rows(conn: &mut PgConnection, def: &TableDef) -> Result<u64, StoreError> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", def.sql_name()))
        .fetch_one(conn)
        .await?;
    Ok(count.max(0) as u64)
}

pub async fn select_column(
    conn: &mut PgConnection,
    def: &TableDef,
    sql_column: &str,
) -> Result<Vec<String>, StoreError> {
    let sql = format!(
        "SELECT {sql_column}::text FROM {} WHERE {sql_column} IS NOT NULL",
        def.sql_name()
    );
    let values = sqlx::query_scalar::<_, String>(&sql).fetch_all(conn).await?;
    Ok(values)
}

/// Insert encoded rows in chunks. Returns rows affected.
pub async fn insert_rows(
    conn: &mut PgConnection,
    def: &TableDef,
    rows: Vec<Vec<SqlValue>>,
) -> Result<u64, StoreError> {
    let column_list = def
        .columns
        .iter()
        .map(|column| column.sql)
        .collect::<Vec<_>>()
        .join(", ");

    let mut affected = 0_u64;
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<Vec<SqlValue>> = rows.by_ref().take(INSERT_CHUNK_ROWS).collect();
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({column_list}) ", def.sql_name()));
        builder.push_values(chunk, |mut row_builder, row| {
            for value in row {
                match value {
                    SqlValue::Text(text) => row_builder.push_bind(text),
                    SqlValue::Integer(number) => row_builder.push_bind(number),
                    SqlValue::Float(number) => row_builder.push_bind(number),
                    SqlValue::Timestamp(ts) => row_builder.push_bind(ts),
                };
            }
        });
        let result = builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|err| classify(def.table, err))?;
        affected += result.rows_affected();
    }
    Ok(affected)
}

pub async fn truncate_table(conn: &mut PgConnection, table: TableName) -> Result<(), StoreError> {
    sqlx::query(&format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        table.as_str()
    ))
    .execute(conn)
    .await?;
    Ok(())
}

/// Separate constraint violations from other database failures.
pub fn classify(table: TableName, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        use sqlx::error::ErrorKind;
        match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => {
                return StoreError::Integrity(format!("{table}: {}", db_err.message()));
            }
            _ => {}
        }
    }
    StoreError::Db(err)
}
