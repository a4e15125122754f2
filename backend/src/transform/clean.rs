//! Column validator & cleaner.
//!
//! Confirms each required source column is present and rewrites its cells as
//! JSON numbers. Currency columns may arrive as `"$1,234.50"` or with a
//! trailing `)`; those characters are stripped before parsing.

use serde_json::Value;

use super::columns::{cleaned_required_columns, Cleaning, ColumnPolicy};
use crate::api::logs::LogSink;
use crate::error::{TransformError, TransformResult};
use crate::models::Table;

const STRIPPED_CHARS: [char; 3] = ['$', ',', ')'];

/// Parse one cell according to `cleaning`. `None` when the cell does not
/// hold a finite number after cleaning.
pub fn parse_cell(value: &Value, cleaning: Cleaning) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let text: String = match cleaning {
                Cleaning::Currency => s.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect(),
                Cleaning::Number | Cleaning::Raw => s.clone(),
            };
            text.trim().parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Clean one column of `table` into numbers.
///
/// Row numbers in errors are 1-based data rows (the header is not counted).
pub fn clean_column(table: &Table, column: &str, cleaning: Cleaning) -> TransformResult<Vec<Value>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let cell = row.get(column).unwrap_or(&Value::Null);
            parse_cell(cell, cleaning)
                .map(Value::from)
                .ok_or_else(|| TransformError::ParseFailure {
                    column: column.to_string(),
                    row: idx + 1,
                    value: crate::models::cell_text(cell),
                })
        })
        .collect()
}

/// Validate and clean every required numeric column.
///
/// Returns a new table; the input is left untouched. The first missing
/// column or unparseable cell aborts.
pub fn validate_and_clean(table: &Table, sink: &dyn LogSink) -> TransformResult<Table> {
    let mut cleaned = table.clone();

    for ColumnPolicy { name, cleaning, .. } in cleaned_required_columns() {
        if !table.has_column(name) {
            return Err(TransformError::missing(*name, "cleanup"));
        }
        let values = clean_column(table, name, *cleaning)?;
        cleaned.set_column(name, values);
        sink.debug(&format!("Cleaned column '{}' into numbers", name));
    }

    Ok(cleaned)
}
