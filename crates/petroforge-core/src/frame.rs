use chrono::NaiveDate;

use crate::error::{CoreError, Result};
use crate::table::Record;
use crate::value::Value;

/// Column-oriented table with an explicit header.
///
/// This is the shape the schema validator inspects and the store persists:
/// unlike [`Table`](crate::Table) it can hold missing or extra columns and
/// cells of the wrong kind, so those defects can be reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut frame = Self::new(columns);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::MisalignedRow {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    // Record::to_row is aligned with Record::columns by contract.
    pub(crate) fn push_aligned(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Iterate over the cells of one column, if present.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Remove a column from the header and every row. Returns false when absent.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Append a column filled with `fill`.
    pub fn add_column(&mut self, name: impl Into<String>, fill: Value) {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
    }

    pub fn set_value(&mut self, row_index: usize, column: &str, value: Value) -> Result<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| CoreError::MissingColumn(column.to_string()))?;
        let row = self.rows.get_mut(row_index).ok_or(CoreError::MisalignedRow {
            expected: row_index + 1,
            found: 0,
        })?;
        row[idx] = value;
        Ok(())
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|values| RowView {
            columns: &self.columns,
            values,
        })
    }

    /// Decode every row into typed records.
    pub fn decode<R: Record>(&self) -> Result<Vec<R>> {
        self.iter_rows().map(|row| R::from_row(&row)).collect()
    }
}

/// Borrowed view of one frame row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> RowView<'a> {
    pub fn get(&self, column: &str) -> Result<&'a Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| &self.values[idx])
            .ok_or_else(|| CoreError::MissingColumn(column.to_string()))
    }

    pub fn text(&self, column: &str) -> Result<&'a str> {
        let value = self.get(column)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(column, "text", value))
    }

    pub fn int(&self, column: &str) -> Result<i64> {
        let value = self.get(column)?;
        value.as_i64().ok_or_else(|| mismatch(column, "int", value))
    }

    pub fn float(&self, column: &str) -> Result<f64> {
        let value = self.get(column)?;
        value.as_f64().ok_or_else(|| mismatch(column, "float", value))
    }

    pub fn date(&self, column: &str) -> Result<NaiveDate> {
        let value = self.get(column)?;
        value.as_date().ok_or_else(|| mismatch(column, "date", value))
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> CoreError {
    CoreError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.kind_name(),
    }
}
