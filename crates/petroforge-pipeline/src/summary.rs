use std::collections::BTreeMap;

use petroforge_core::TableName;

use crate::log::ExecutionLog;

const RULE: &str = "======================================================================";

/// Render the end-of-run summary: counts per stage, duration, status and errors.
pub fn render_summary(log: &ExecutionLog) -> String {
    let mut lines = vec![RULE.to_string(), "PIPELINE SUMMARY".to_string(), RULE.to_string()];

    lines.push(format!("run_id: {}", log.run_id));
    if let Some(duration) = log.duration() {
        lines.push(format!(
            "duration: {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        ));
    }
    lines.push(format!("status: {}", log.status.as_str().to_uppercase()));

    push_counts(&mut lines, "generated", &log.tables_generated);
    push_counts(&mut lines, "validated", &log.tables_validated);
    push_counts(&mut lines, "inserted", &log.tables_inserted);

    if !log.errors.is_empty() {
        lines.push(String::new());
        lines.push("errors:".to_string());
        for error in &log.errors {
            lines.push(format!("- {error}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("total inserted: {}", log.total_inserted()));
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn push_counts(lines: &mut Vec<String>, label: &str, counts: &BTreeMap<TableName, u64>) {
    lines.push(String::new());
    lines.push(format!("{label}:"));
    if counts.is_empty() {
        lines.push("- none".to_string());
    }
    for (table, count) in counts {
        lines.push(format!("- {table}: {count}"));
    }
}
