use std::collections::{HashMap, HashSet};

use petroforge_core::{Frame, Value};

use crate::contract::{ColumnContract, TableSchema};
use crate::errors::SchemaErrors;
use crate::model::{Violation, ViolationCode};

/// Check `frame` against `schema`, collecting every violation.
///
/// On success the frame is returned unchanged, so validating a validated
/// frame yields the same frame.
pub fn validate_frame(frame: &Frame, schema: &TableSchema) -> Result<Frame, SchemaErrors> {
    let mut violations = Vec::new();

    if schema.strict {
        for column in frame.columns() {
            if schema.column(column).is_none() {
                violations.push(Violation::column(
                    ViolationCode::ColumnNotInSchema,
                    column,
                    format!("column '{column}' is not declared by the {} schema", schema.table),
                ));
            }
        }
    }

    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, column) in frame.columns().iter().enumerate() {
        if positions.contains_key(column.as_str()) {
            violations.push(Violation::column(
                ViolationCode::DuplicateColumn,
                column,
                format!("column '{column}' appears more than once"),
            ));
        } else {
            positions.insert(column.as_str(), idx);
        }
    }

    for contract in &schema.columns {
        match positions.get(contract.name) {
            Some(&idx) => check_column(frame, idx, contract, &mut violations),
            None => violations.push(Violation::column(
                ViolationCode::ColumnMissing,
                contract.name,
                format!("declared column '{}' is missing", contract.name),
            )),
        }
    }

    if violations.is_empty() {
        Ok(frame.clone())
    } else {
        Err(SchemaErrors {
            table: schema.table,
            rows: frame.len(),
            violations,
        })
    }
}

fn check_column(
    frame: &Frame,
    idx: usize,
    contract: &ColumnContract,
    violations: &mut Vec<Violation>,
) {
    let mut seen: HashSet<String> = HashSet::new();

    for (row_index, row) in frame.rows().iter().enumerate() {
        let value = &row[idx];
        if value.is_null() {
            if !contract.nullable {
                violations.push(Violation::cell(
                    ViolationCode::NullValue,
                    contract.name,
                    row_index,
                    "null value in non-nullable column",
                    None,
                ));
            }
            continue;
        }

        if !contract.kind.accepts(value) {
            violations.push(Violation::cell(
                ViolationCode::TypeMismatch,
                contract.name,
                row_index,
                format!(
                    "expected {}, found {}",
                    contract.kind.as_str(),
                    value.kind_name()
                ),
                Some(value.render()),
            ));
            continue;
        }

        if let Some((code, message)) = contract
            .check
            .as_ref()
            .and_then(|check| check.evaluate(value))
        {
            violations.push(Violation::cell(
                code,
                contract.name,
                row_index,
                message,
                Some(value.render()),
            ));
        }

        if contract.unique && !seen.insert(unique_key(value)) {
            violations.push(Violation::cell(
                ViolationCode::DuplicateValue,
                contract.name,
                row_index,
                "duplicate value in unique column",
                Some(value.render()),
            ));
        }
    }
}

fn unique_key(value: &Value) -> String {
    format!("{}:{}", value.kind_name(), value.render())
}
