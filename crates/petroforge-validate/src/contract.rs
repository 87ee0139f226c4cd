use petroforge_core::{TableName, Value};
use serde::Serialize;

use crate::model::ViolationCode;

/// Expected cell kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    Date,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Date => "date",
        }
    }

    /// Whether a non-null cell satisfies this kind. Ints widen to floats.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnKind::Int, Value::Int(_))
                | (ColumnKind::Float, Value::Int(_) | Value::Float(_))
                | (ColumnKind::Text, Value::Text(_))
                | (ColumnKind::Date, Value::Date(_))
        )
    }
}

/// Value-level predicate attached to a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    OneOf { values: Vec<&'static str> },
    OneOfInt { values: Vec<i64> },
    Range { min: f64, max: f64 },
    Min { min: f64 },
}

impl Check {
    /// Evaluate a cell already known to match the column kind.
    pub fn evaluate(&self, value: &Value) -> Option<(ViolationCode, String)> {
        match self {
            Check::OneOf { values } => {
                let text = value.as_str()?;
                (!values.iter().any(|allowed| *allowed == text)).then(|| {
                    (
                        ViolationCode::Domain,
                        format!("'{text}' is not one of [{}]", values.join(", ")),
                    )
                })
            }
            Check::OneOfInt { values } => {
                let number = value.as_i64()?;
                (!values.contains(&number)).then(|| {
                    let allowed: Vec<String> = values.iter().map(i64::to_string).collect();
                    (
                        ViolationCode::Domain,
                        format!("{number} is not one of [{}]", allowed.join(", ")),
                    )
                })
            }
            Check::Range { min, max } => {
                let number = value.as_f64()?;
                (!(*min..=*max).contains(&number)).then(|| {
                    (
                        ViolationCode::Range,
                        format!("{number} is outside [{min}, {max}]"),
                    )
                })
            }
            Check::Min { min } => {
                let number = value.as_f64()?;
                // NaN fails as well.
                (!(number >= *min))
                    .then(|| (ViolationCode::Range, format!("{number} is below {min}")))
            }
        }
    }
}

/// Contract of one declared column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnContract {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<Check>,
}

impl ColumnContract {
    pub fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            unique: false,
            check: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }
}

/// Declared schema of one table.
///
/// A strict schema rejects columns it does not declare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub table: TableName,
    pub columns: Vec<ColumnContract>,
    pub strict: bool,
}

impl TableSchema {
    pub fn strict(table: TableName, columns: Vec<ColumnContract>) -> Self {
        Self {
            table,
            columns,
            strict: true,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnContract> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_satisfy_float_columns_only() {
        assert!(ColumnKind::Float.accepts(&Value::Int(3)));
        assert!(!ColumnKind::Int.accepts(&Value::Float(3.0)));
        assert!(!ColumnKind::Text.accepts(&Value::Int(3)));
    }

    #[test]
    fn range_and_min_reject_nan() {
        let range = Check::Range { min: 0.0, max: 24.0 };
        assert!(range.evaluate(&Value::Float(12.5)).is_none());
        assert!(range.evaluate(&Value::Int(24)).is_none());
        assert_eq!(
            range.evaluate(&Value::Float(f64::NAN)).map(|(code, _)| code),
            Some(ViolationCode::Range)
        );
        let min = Check::Min { min: 0.0 };
        assert!(min.evaluate(&Value::Float(f64::NAN)).is_some());
        assert!(min.evaluate(&Value::Float(-0.5)).is_some());
        assert!(min.evaluate(&Value::Int(0)).is_none());
    }

    #[test]
    fn domain_checks_report_allowed_values() {
        let check = Check::OneOf {
            values: vec!["Baixa", "Média", "Alta"],
        };
        let (code, message) = check.evaluate(&Value::from("Critica")).expect("violation");
        assert_eq!(code, ViolationCode::Domain);
        assert!(message.contains("Baixa, Média, Alta"));
        assert!(check.evaluate(&Value::from("Alta")).is_none());
    }
}
