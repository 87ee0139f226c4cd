use crate::errors::SchemaErrors;

/// Render a deterministic markdown summary of schema violations.
pub fn render_violations(errors: &SchemaErrors, max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("## Schema violations: {}", errors.table));
    lines.push(format!("- rows: {}", errors.rows));
    lines.push(format!("- violations: {}", errors.len()));
    lines.push(String::new());

    lines.push("| code | count |".to_string());
    lines.push("| --- | --- |".to_string());
    for (code, count) in errors.counts_by_code() {
        lines.push(format!("| {code} | {count} |"));
    }
    lines.push(String::new());

    let mut examples: Vec<_> = errors.violations.iter().collect();
    examples.sort_by(|a, b| {
        (a.column.as_str(), a.code, a.row_index).cmp(&(b.column.as_str(), b.code, b.row_index))
    });
    for violation in examples.iter().take(max_examples) {
        let row = violation
            .row_index
            .map(|row| format!(" row {row}"))
            .unwrap_or_default();
        let value = violation
            .value
            .as_ref()
            .map(|value| format!(" value={value}"))
            .unwrap_or_default();
        lines.push(format!(
            "- {}{} [{}]: {}{}",
            violation.column, row, violation.code, violation.message, value
        ));
    }
    if errors.len() > max_examples {
        lines.push(format!("- ... {} more", errors.len() - max_examples));
    }

    lines.join("\n")
}
