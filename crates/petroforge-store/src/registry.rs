//! Enum-keyed table definitions injected into every store.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use petroforge_core::{Frame, TableName, Value};

use crate::errors::StoreError;

/// Persisted column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Float,
    Timestamp,
}

impl SqlType {
    pub fn ddl(self) -> &'static str {
        match self {
            SqlType::Text => "VARCHAR",
            SqlType::Integer => "INTEGER",
            SqlType::Float => "DOUBLE PRECISION",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }
}

/// A cell converted to the persisted column type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i32),
    Float(f64),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Convert a frame cell for a column of type `sql_type`.
    ///
    /// Integers are accepted by text columns, dates become midnight
    /// timestamps. Nulls are rejected: every persisted column is NOT NULL.
    pub fn encode(
        value: &Value,
        sql_type: SqlType,
        table: TableName,
        column: &str,
    ) -> Result<SqlValue, StoreError> {
        let encoded = match (sql_type, value) {
            (_, Value::Null) => {
                return Err(StoreError::Integrity(format!(
                    "null value in column {table}.{column}"
                )));
            }
            (SqlType::Text, Value::Text(text)) => SqlValue::Text(text.clone()),
            (SqlType::Text, Value::Int(number)) => SqlValue::Text(number.to_string()),
            (SqlType::Integer, Value::Int(number)) => {
                SqlValue::Integer(i32::try_from(*number).map_err(|_| StoreError::Encode {
                    table: table.to_string(),
                    column: column.to_string(),
                    message: format!("{number} does not fit INTEGER"),
                })?)
            }
            (SqlType::Float, Value::Float(number)) => SqlValue::Float(*number),
            (SqlType::Float, Value::Int(number)) => SqlValue::Float(*number as f64),
            (SqlType::Timestamp, Value::Date(date)) => {
                let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| StoreError::Encode {
                    table: table.to_string(),
                    column: column.to_string(),
                    message: format!("{date} has no midnight"),
                })?;
                SqlValue::Timestamp(midnight)
            }
            (sql_type, other) => {
                return Err(StoreError::Encode {
                    table: table.to_string(),
                    column: column.to_string(),
                    message: format!("{} cell for {} column", other.kind_name(), sql_type.ddl()),
                });
            }
        };
        Ok(encoded)
    }

    /// Text rendering used for key comparisons.
    pub fn key(&self) -> String {
        match self {
            SqlValue::Text(text) => text.clone(),
            SqlValue::Integer(number) => number.to_string(),
            SqlValue::Float(number) => number.to_string(),
            SqlValue::Timestamp(ts) => ts.to_string(),
        }
    }
}

/// One persisted column and the frame column it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: &'static str,
    pub sql: &'static str,
    pub sql_type: SqlType,
}

/// A frame column that must reference the key of a parent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub field: &'static str,
    pub parent: TableName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub table: TableName,
    /// Frame column holding the unique entity code.
    pub key: &'static str,
    pub columns: Vec<ColumnDef>,
    pub parents: Vec<ForeignKeyDef>,
}

impl TableDef {
    pub fn sql_name(&self) -> &'static str {
        self.table.as_str()
    }

    pub fn column(&self, field: &str) -> Result<&ColumnDef, StoreError> {
        self.columns
            .iter()
            .find(|column| column.field == field)
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.table.to_string(),
                column: field.to_string(),
            })
    }

    pub fn key_column(&self) -> Result<&ColumnDef, StoreError> {
        self.column(self.key)
    }

    /// Encode every row of `frame` in the column order of this definition.
    ///
    /// Frame columns the table does not declare are rejected; declared
    /// columns absent from the frame are null violations.
    pub fn encode_rows(&self, frame: &Frame) -> Result<Vec<Vec<SqlValue>>, StoreError> {
        for field in frame.columns() {
            self.column(field)?;
        }
        let positions = self
            .columns
            .iter()
            .map(|column| {
                frame.column_index(column.field).ok_or_else(|| {
                    StoreError::Integrity(format!(
                        "missing value for NOT NULL column {}.{}",
                        self.table, column.sql
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        frame
            .rows()
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(&positions)
                    .map(|(column, idx)| {
                        SqlValue::encode(&row[*idx], column.sql_type, self.table, column.sql)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Lookup from table name to its definition.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: BTreeMap<TableName, TableDef>,
}

fn col(field: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef {
        field,
        sql: field,
        sql_type,
    }
}

impl TableRegistry {
    pub fn new(defs: impl IntoIterator<Item = TableDef>) -> Self {
        Self {
            tables: defs.into_iter().map(|def| (def.table, def)).collect(),
        }
    }

    /// Definitions of the four persisted tables.
    pub fn standard() -> Self {
        use SqlType::*;
        Self::new([
            TableDef {
                table: TableName::Wells,
                key: TableName::Wells.key_column(),
                columns: vec![
                    col("codigo_poco", Text),
                    col("nome_poco", Text),
                    col("tipo_poco", Text),
                    col("localizacao", Text),
                    col("camada", Text),
                    col("profundidade_metros", Integer),
                    col("status_operacional", Text),
                    col("data_perfuracao", Timestamp),
                    col("operadora", Text),
                ],
                parents: Vec::new(),
            },
            TableDef {
                table: TableName::Equipment,
                key: TableName::Equipment.key_column(),
                columns: vec![
                    col("cod_equipamento", Text),
                    col("cod_poco", Text),
                    col("tipo_equipamento", Text),
                    col("marca", Text),
                    col("modelo", Text),
                    // Persisted under the historical misspelling.
                    ColumnDef {
                        field: "data_instalacao",
                        sql: "data_instalcao",
                        sql_type: Timestamp,
                    },
                    col("vida_util_anos", Integer),
                    col("ultimo_teste", Timestamp),
                    col("eficiencia_operacional", Float),
                ],
                parents: vec![ForeignKeyDef {
                    field: "cod_poco",
                    parent: TableName::Wells,
                }],
            },
            TableDef {
                table: TableName::Production,
                key: TableName::Production.key_column(),
                columns: vec![
                    col("cod_producao", Text),
                    col("cod_poco", Text),
                    col("data_producao", Timestamp),
                    col("petroleo_barris_dia", Integer),
                    col("agua_produzida_m3", Float),
                    col("tempo_horas_operacao", Float),
                    col("pressao_bar", Integer),
                    col("temperatura_celsius", Float),
                ],
                parents: vec![ForeignKeyDef {
                    field: "cod_poco",
                    parent: TableName::Wells,
                }],
            },
            TableDef {
                table: TableName::Incidents,
                key: TableName::Incidents.key_column(),
                columns: vec![
                    col("cod_incidente", Text),
                    col("cod_poco", Text),
                    col("cod_equipamento", Text),
                    col("data_incidente", Timestamp),
                    col("tipo_incidente", Text),
                    col("severidade", Text),
                    col("tempo_parada_horas", Float),
                    col("custo_estimado_reais", Integer),
                    col("status_resolucao", Text),
                ],
                parents: vec![
                    ForeignKeyDef {
                        field: "cod_poco",
                        parent: TableName::Wells,
                    },
                    ForeignKeyDef {
                        field: "cod_equipamento",
                        parent: TableName::Equipment,
                    },
                ],
            },
        ])
    }

    pub fn get(&self, table: TableName) -> Result<&TableDef, StoreError> {
        self.tables
            .get(&table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    /// Registered tables in dependency order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn well_type_code_is_stored_as_text() {
        let value = SqlValue::encode(&Value::Int(2), SqlType::Text, TableName::Wells, "tipo_poco");
        assert_eq!(value.unwrap(), SqlValue::Text("2".to_string()));
    }

    #[test]
    fn dates_become_midnight_timestamps() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let value = SqlValue::encode(
            &Value::Date(date),
            SqlType::Timestamp,
            TableName::Production,
            "data_producao",
        )
        .unwrap();
        assert_eq!(value, SqlValue::Timestamp(date.and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn nulls_and_overflow_are_rejected() {
        let null = SqlValue::encode(&Value::Null, SqlType::Text, TableName::Wells, "nome_poco");
        assert!(null.unwrap_err().is_integrity());
        let overflow = SqlValue::encode(
            &Value::Int(i64::from(i32::MAX) + 1),
            SqlType::Integer,
            TableName::Incidents,
            "custo_estimado_reais",
        );
        assert!(matches!(overflow, Err(StoreError::Encode { .. })));
    }

    #[test]
    fn equipment_installation_date_maps_to_legacy_column() {
        let registry = TableRegistry::standard();
        let def = registry.get(TableName::Equipment).unwrap();
        assert_eq!(def.column("data_instalacao").unwrap().sql, "data_instalcao");
        assert!(matches!(
            def.column("data_instalcao"),
            Err(StoreError::UnknownColumn { .. })
        ));
    }
}
