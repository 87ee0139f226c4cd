use std::collections::BTreeMap;

use petroforge_core::TableName;
use serde::Serialize;
use thiserror::Error;

use crate::model::{Violation, ViolationCode};

/// Every violation found in one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaErrors {
    pub table: TableName,
    pub rows: usize,
    pub violations: Vec<Violation>,
}

impl SchemaErrors {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn counts_by_code(&self) -> BTreeMap<ViolationCode, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.code).or_insert(0) += 1;
        }
        counts
    }

    /// True when some violation of `code` names `column`.
    pub fn has(&self, code: ViolationCode, column: &str) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.code == code && violation.column == column)
    }
}

/// Errors emitted by the schema validator.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("nothing to validate for {table}: {reason}")]
    EmptyInput { table: TableName, reason: String },
    #[error("{} failed schema validation with {} violation(s)", .0.table, .0.len())]
    Schema(SchemaErrors),
}

impl ValidationError {
    pub fn schema_errors(&self) -> Option<&SchemaErrors> {
        match self {
            ValidationError::Schema(errors) => Some(errors),
            ValidationError::EmptyInput { .. } => None,
        }
    }
}
