use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of contract a cell or column broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    ColumnNotInSchema,
    ColumnMissing,
    DuplicateColumn,
    TypeMismatch,
    NullValue,
    DuplicateValue,
    Domain,
    Range,
}

impl ViolationCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCode::ColumnNotInSchema => "column_not_in_schema",
            ViolationCode::ColumnMissing => "column_missing",
            ViolationCode::DuplicateColumn => "duplicate_column",
            ViolationCode::TypeMismatch => "type_mismatch",
            ViolationCode::NullValue => "null_value",
            ViolationCode::DuplicateValue => "duplicate_value",
            ViolationCode::Domain => "domain",
            ViolationCode::Range => "range",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured violation record.
///
/// Column-level violations carry no `row_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Violation {
    pub(crate) fn column(code: ViolationCode, column: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            column: column.to_string(),
            row_index: None,
            message: message.into(),
            value: None,
        }
    }

    pub(crate) fn cell(
        code: ViolationCode,
        column: &str,
        row_index: usize,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            code,
            column: column.to_string(),
            row_index: Some(row_index),
            message: message.into(),
            value,
        }
    }
}
