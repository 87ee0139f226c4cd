use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::frame::{Frame, RowView};
use crate::value::Value;

/// Persisted tables, ordered parents first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableName {
    #[serde(rename = "raw_pocos")]
    Wells,
    #[serde(rename = "raw_equipamentos")]
    Equipment,
    #[serde(rename = "raw_producao")]
    Production,
    #[serde(rename = "raw_incidentes")]
    Incidents,
}

impl TableName {
    /// Every table in dependency order.
    pub const ALL: [TableName; 4] = [
        TableName::Wells,
        TableName::Equipment,
        TableName::Production,
        TableName::Incidents,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Wells => "raw_pocos",
            TableName::Equipment => "raw_equipamentos",
            TableName::Production => "raw_producao",
            TableName::Incidents => "raw_incidentes",
        }
    }

    /// Column holding the unique entity code.
    pub fn key_column(self) -> &'static str {
        match self {
            TableName::Wells => "codigo_poco",
            TableName::Equipment => "cod_equipamento",
            TableName::Production => "cod_producao",
            TableName::Incidents => "cod_incidente",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        TableName::ALL
            .into_iter()
            .find(|table| table.as_str() == value)
    }

    /// Children before parents.
    pub fn truncate_order() -> [TableName; 4] {
        let mut order = TableName::ALL;
        order.reverse();
        order
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed entity row that maps onto one persisted table.
pub trait Record: Sized + Clone {
    const TABLE: TableName;

    /// Column names in persisted order.
    fn columns() -> &'static [&'static str];

    /// The entity's unique code.
    fn key(&self) -> &str;

    /// Cells aligned with [`Record::columns`].
    fn to_row(&self) -> Vec<Value>;

    fn from_row(row: &RowView<'_>) -> Result<Self>;
}

/// Typed table of records with unique keys.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
    keys: HashSet<String>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            keys: HashSet::new(),
        }
    }
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<R>) -> Result<Self> {
        let mut table = Self::new();
        table.append_chunk(rows)?;
        Ok(table)
    }

    /// Append a sub-batch of rows.
    ///
    /// The chunk is applied all-or-nothing: if any key collides with the
    /// table or with another row of the chunk, nothing is appended.
    pub fn append_chunk(&mut self, chunk: Vec<R>) -> Result<usize> {
        let mut staged = HashSet::with_capacity(chunk.len());
        for row in &chunk {
            let key = row.key();
            if self.keys.contains(key) || !staged.insert(key.to_string()) {
                return Err(CoreError::DuplicateKey {
                    table: R::TABLE.as_str(),
                    key: key.to_string(),
                });
            }
        }

        let appended = chunk.len();
        self.keys.extend(staged);
        self.rows.extend(chunk);
        Ok(appended)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.key())
    }

    pub fn to_frame(&self) -> Frame {
        let columns = R::columns().iter().map(|name| name.to_string()).collect();
        let mut frame = Frame::new(columns);
        for row in &self.rows {
            frame.push_aligned(row.to_row());
        }
        frame
    }

    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::from_rows(frame.decode::<R>()?)
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
